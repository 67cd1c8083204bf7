//! Response mode resolution.
//!
//! The `response_mode` authorization request parameter selects how response
//! parameters travel back to the client: in the redirect query string, in the
//! URI fragment, or as an auto-submitted POST form. The JWT-secured variants
//! (JARM) wrap the parameters in a signed token first. The generic `jwt` mode
//! is canonicalized against the requested response types before delivery.

use std::fmt;

/// The response mode requested by the client.
///
/// `Default` stands for an absent `response_mode` parameter. Values this
/// crate does not know are preserved as `Extension` and delegated to the
/// registered response mode handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResponseMode {
    /// No `response_mode` parameter was supplied.
    Default,
    /// `query` — parameters merged into the redirect query string.
    Query,
    /// `fragment` — parameters appended as the redirect fragment.
    Fragment,
    /// `form_post` — parameters posted via an auto-submitting HTML form.
    FormPost,
    /// `jwt` — JWT-secured, concrete carrier derived from the response types.
    Jwt,
    /// `query.jwt` — JWT-secured query delivery.
    JwtQuery,
    /// `fragment.jwt` — JWT-secured fragment delivery.
    JwtFragment,
    /// `form_post.jwt` — JWT-secured form-post delivery.
    JwtFormPost,
    /// Any other value, handled by an extension response mode handler.
    Extension(String),
}

impl ResponseMode {
    /// Parses the wire value of the `response_mode` request parameter.
    /// An empty value maps to [`ResponseMode::Default`].
    #[must_use]
    pub fn from_parameter(value: &str) -> Self {
        match value {
            "" => Self::Default,
            "query" => Self::Query,
            "fragment" => Self::Fragment,
            "form_post" => Self::FormPost,
            "jwt" => Self::Jwt,
            "query.jwt" => Self::JwtQuery,
            "fragment.jwt" => Self::JwtFragment,
            "form_post.jwt" => Self::JwtFormPost,
            other => Self::Extension(other.to_string()),
        }
    }

    /// Returns the wire value of this mode.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "",
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::FormPost => "form_post",
            Self::Jwt => "jwt",
            Self::JwtQuery => "query.jwt",
            Self::JwtFragment => "fragment.jwt",
            Self::JwtFormPost => "form_post.jwt",
            Self::Extension(tag) => tag,
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The carrier for encoded response parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    /// Merge into the redirect target's query string.
    Query,
    /// Append as the redirect target's fragment.
    Fragment,
    /// Render an auto-submitting HTML form that POSTs to the target.
    FormPost,
}

/// A fully resolved response mode, computed fresh for every dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConcreteResponseMode {
    /// Plaintext parameter delivery.
    Plain(DeliveryMethod),
    /// JWT-secured (JARM) delivery: parameters are wrapped in a signed token.
    Jwt(DeliveryMethod),
    /// An extension mode to be handled by a registered handler.
    Extension(String),
}

impl ConcreteResponseMode {
    /// Returns `true` for the JWT-secured modes.
    #[must_use]
    pub fn is_jwt_secured(&self) -> bool {
        matches!(self, Self::Jwt(_))
    }
}

/// Canonicalizes the requested response mode into a concrete one.
///
/// The generic `jwt` mode resolves to JWT-secured query delivery when the
/// response type set is exactly `{code}` (pure authorization-code flow), and
/// to JWT-secured fragment delivery otherwise (implicit and hybrid flows).
/// Success and error delivery share this function so an error can never leak
/// through a different channel than the matching success would have used.
#[must_use]
pub fn resolve_response_mode(
    mode: &ResponseMode,
    response_types: &[String],
) -> ConcreteResponseMode {
    match mode {
        ResponseMode::Default | ResponseMode::Query => {
            ConcreteResponseMode::Plain(DeliveryMethod::Query)
        }
        ResponseMode::Fragment => ConcreteResponseMode::Plain(DeliveryMethod::Fragment),
        ResponseMode::FormPost => ConcreteResponseMode::Plain(DeliveryMethod::FormPost),
        ResponseMode::Jwt => {
            if response_types.len() == 1 && response_types[0] == "code" {
                ConcreteResponseMode::Jwt(DeliveryMethod::Query)
            } else {
                ConcreteResponseMode::Jwt(DeliveryMethod::Fragment)
            }
        }
        ResponseMode::JwtQuery => ConcreteResponseMode::Jwt(DeliveryMethod::Query),
        ResponseMode::JwtFragment => ConcreteResponseMode::Jwt(DeliveryMethod::Fragment),
        ResponseMode::JwtFormPost => ConcreteResponseMode::Jwt(DeliveryMethod::FormPost),
        ResponseMode::Extension(tag) => ConcreteResponseMode::Extension(tag.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parameter_roundtrip() {
        for value in [
            "",
            "query",
            "fragment",
            "form_post",
            "jwt",
            "query.jwt",
            "fragment.jwt",
            "form_post.jwt",
            "custom_mode",
        ] {
            let mode = ResponseMode::from_parameter(value);
            assert_eq!(mode.as_str(), value);
        }
    }

    #[test]
    fn test_default_resolves_to_query() {
        assert_eq!(
            resolve_response_mode(&ResponseMode::Default, &types(&["code"])),
            ConcreteResponseMode::Plain(DeliveryMethod::Query)
        );
    }

    #[test]
    fn test_generic_jwt_resolves_by_response_type() {
        // Pure authorization-code flow secures the query string.
        assert_eq!(
            resolve_response_mode(&ResponseMode::Jwt, &types(&["code"])),
            ConcreteResponseMode::Jwt(DeliveryMethod::Query)
        );

        // Implicit and hybrid flows secure the fragment.
        assert_eq!(
            resolve_response_mode(&ResponseMode::Jwt, &types(&["token"])),
            ConcreteResponseMode::Jwt(DeliveryMethod::Fragment)
        );
        assert_eq!(
            resolve_response_mode(&ResponseMode::Jwt, &types(&["id_token"])),
            ConcreteResponseMode::Jwt(DeliveryMethod::Fragment)
        );
        assert_eq!(
            resolve_response_mode(&ResponseMode::Jwt, &types(&["code", "id_token"])),
            ConcreteResponseMode::Jwt(DeliveryMethod::Fragment)
        );
    }

    #[test]
    fn test_explicit_jwt_modes() {
        assert_eq!(
            resolve_response_mode(&ResponseMode::JwtQuery, &types(&["token"])),
            ConcreteResponseMode::Jwt(DeliveryMethod::Query)
        );
        assert_eq!(
            resolve_response_mode(&ResponseMode::JwtFormPost, &types(&["code"])),
            ConcreteResponseMode::Jwt(DeliveryMethod::FormPost)
        );
    }

    #[test]
    fn test_extension_passes_through() {
        let mode = ResponseMode::Extension("web_message".to_string());
        assert_eq!(
            resolve_response_mode(&mode, &types(&["code"])),
            ConcreteResponseMode::Extension("web_message".to_string())
        );
    }
}
