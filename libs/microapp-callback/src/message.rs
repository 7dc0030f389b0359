use serde::{Deserialize, Serialize};

/// Body of a push delivered by the platform to the registered callback URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackMessage {
    #[serde(rename = "MsgSignature")]
    pub msg_signature: String,
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    #[serde(rename = "Nonce")]
    pub nonce: String,
    /// Base64 `IV || ciphertext`
    #[serde(rename = "Encrypt")]
    pub encrypt: String,
}

impl CallbackMessage {
    /// Parse a push body as received over HTTP.
    ///
    /// # Errors
    /// Returns the JSON error if the body does not have the four fields.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_field_names() {
        let msg = CallbackMessage::from_slice(
            br#"{"MsgSignature":"abc","TimeStamp":"1700000000","Nonce":"n1","Encrypt":"ZZZ="}"#,
        )
        .unwrap();
        assert_eq!(msg.msg_signature, "abc");
        assert_eq!(msg.timestamp, "1700000000");
        assert_eq!(msg.nonce, "n1");
        assert_eq!(msg.encrypt, "ZZZ=");
    }

    #[test]
    fn missing_field_is_rejected() {
        assert!(CallbackMessage::from_slice(br#"{"MsgSignature":"abc"}"#).is_err());
    }

    #[test]
    fn serializes_back_to_platform_names() {
        let msg = CallbackMessage {
            msg_signature: "s".to_owned(),
            timestamp: "t".to_owned(),
            nonce: "n".to_owned(),
            encrypt: "e".to_owned(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["TimeStamp"], "t");
        assert_eq!(json["Encrypt"], "e");
    }
}
