use serde_json::Value;

use crate::error::Result;

/// Decoded application state for one render.
///
/// The structure is owned by the calling application; the bridge only
/// decodes it and hands it to the renderer. Any JSON value is
/// accepted. The state lives exactly as long as the render operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState(Value);

impl PageState {
    /// Decode a state payload from its serialized form.
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        Ok(Self(serde_json::from_slice(payload)?))
    }

    /// Decode a state payload from a string.
    pub fn from_str(payload: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(payload)?))
    }

    /// Look up a top-level field, when the state is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The top-level `title` field, when present and a string.
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for PageState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_object_state() {
        let state = PageState::from_slice(br#"{"title":"Home","items":[1,2]}"#).unwrap();
        assert_eq!(state.title(), Some("Home"));
        assert_eq!(state.get("items").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn non_object_state_is_accepted() {
        let state = PageState::from_str("[1,2,3]").unwrap();
        assert_eq!(state.title(), None);
        assert!(state.as_value().is_array());
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let err = PageState::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, crate::RenderError::Decode(_)));
    }

    #[test]
    fn non_string_title_is_none() {
        let state = PageState::from_str(r#"{"title":42}"#).unwrap();
        assert_eq!(state.title(), None);
    }
}
