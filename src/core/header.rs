use crate::constants::{CSP_SECTION, SEMICOLON_SPACE};
use crate::core::policy::NormalizedPolicy;
use crate::error::CspError;
use actix_web::http::header::HeaderValue;

/// Renders a normalized policy section into a header string.
pub trait HeaderSerializer: Send + Sync {
    fn serialize(&self, section: &str, policy: &NormalizedPolicy) -> Result<String, CspError>;

    fn header_value(&self, section: &str, policy: &NormalizedPolicy) -> Result<HeaderValue, CspError> {
        let value = self.serialize(section, policy)?;
        HeaderValue::from_str(&value)
            .map_err(|err| CspError::InvalidDirectiveValue(format!("{}: {}", err, value)))
    }
}

/// Default serializer: `name token token; name token` in policy order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CspHeaderSerializer;

impl HeaderSerializer for CspHeaderSerializer {
    fn serialize(&self, section: &str, policy: &NormalizedPolicy) -> Result<String, CspError> {
        if section != CSP_SECTION {
            return Err(CspError::SerializationError(format!(
                "unsupported header section: {}",
                section
            )));
        }

        let mut buffer = String::with_capacity(policy.estimated_size());
        for (name, tokens) in policy.directives() {
            if !buffer.is_empty() {
                buffer.push_str(SEMICOLON_SPACE);
            }
            buffer.push_str(name);
            for token in tokens {
                buffer.push(' ');
                buffer.push_str(token);
            }
        }

        Ok(buffer)
    }
}
