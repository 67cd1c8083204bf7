//! Wire encoding of response parameters.
//!
//! Three wire shapes exist: merging into the redirect target's query string,
//! appending as its fragment, and rendering an auto-submitting HTML form
//! that POSTs the parameters to the target. The first two yield an HTTP 303
//! redirect; the form post yields an HTML body.

use http::StatusCode;
use url::Url;

use crate::mode::DeliveryMethod;
use crate::params::Parameters;

/// Content type of the form-post HTML document.
pub const FORM_POST_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// The transport-level action produced by encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportAction {
    /// Redirect the user agent (HTTP 303, `Location` header).
    Redirect {
        /// The final redirect target including encoded parameters.
        location: String,
    },
    /// Write a response body directly.
    Body {
        /// Response status code.
        status: StatusCode,
        /// `Content-Type` header value.
        content_type: &'static str,
        /// The response body.
        body: String,
    },
}

/// Encodes `parameters` for delivery via `method` to `redirect_uri`.
#[must_use]
pub fn encode_parameters(
    method: DeliveryMethod,
    redirect_uri: &Url,
    parameters: &Parameters,
    template: &FormPostTemplate,
) -> TransportAction {
    match method {
        DeliveryMethod::Query => {
            let mut target = redirect_uri.clone();
            let mut merged = Parameters::from_pairs(
                target
                    .query_pairs()
                    .map(|(key, value)| (key.into_owned(), value.into_owned())),
            );
            // New values win over pre-existing query parameters.
            for key in parameters.keys() {
                merged.remove(key);
            }
            for (key, value) in parameters.iter() {
                merged.append(key, value);
            }
            if merged.is_empty() {
                target.set_query(None);
            } else {
                target.set_query(Some(&merged.to_query_string()));
            }
            TransportAction::Redirect {
                location: target.to_string(),
            }
        }
        DeliveryMethod::Fragment => {
            // The redirect endpoint must not carry a fragment of its own;
            // whatever is there is discarded before appending parameters.
            let mut target = redirect_uri.clone();
            target.set_fragment(None);
            let mut location = target.to_string();
            if !parameters.is_empty() {
                location.push('#');
                location.push_str(&parameters.to_query_string());
            }
            TransportAction::Redirect { location }
        }
        DeliveryMethod::FormPost => TransportAction::Body {
            status: StatusCode::OK,
            content_type: FORM_POST_CONTENT_TYPE,
            body: template.render(redirect_uri.as_str(), parameters),
        },
    }
}

/// Default auto-submitting form document.
///
/// `{{action}}` receives the escaped redirect target, `{{fields}}` the
/// rendered hidden input fields.
const DEFAULT_FORM_POST_DOCUMENT: &str = r#"<html>
<head><title>Submit This Form</title></head>
<body onload="javascript:document.forms[0].submit()">
<form method="post" action="{{action}}">
{{fields}}</form>
</body>
</html>
"#;

/// The HTML document used for form-post delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPostTemplate {
    document: String,
}

impl FormPostTemplate {
    /// Creates a template from a custom document. The document should
    /// contain the `{{action}}` and `{{fields}}` placeholders.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Renders the document for `action` with hidden fields for
    /// `parameters`. All interpolated values are HTML-escaped.
    #[must_use]
    pub fn render(&self, action: &str, parameters: &Parameters) -> String {
        let mut fields = String::new();
        for (key, value) in parameters.iter() {
            fields.push_str(&format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\"/>\n",
                escape_html(key),
                escape_html(value)
            ));
        }
        self.document
            .replace("{{action}}", &escape_html(action))
            .replace("{{fields}}", &fields)
    }
}

impl Default for FormPostTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_POST_DOCUMENT)
    }
}

/// Escapes text for embedding in HTML content and attribute values.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
