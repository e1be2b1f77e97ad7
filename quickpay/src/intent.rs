//! Payment intents and their QR payload encoding.
//!
//! A [`PaymentIntent`] is the seller-authored request a buyer fulfils: who gets
//! paid, how much, and what for. It travels from the seller's screen to the
//! buyer's camera as a small JSON object:
//!
//! ```json
//! {"seller":"0xABC","amount":"10","ref":"Book"}
//! ```
//!
//! The key names are part of the wire contract between the generator and the
//! scanner. Renaming any of them breaks compatibility with already printed codes.

use serde_json::{Map, Value};

/// Maximum length of a payment reference, in characters.
///
/// Bounds the size of the QR payload so that generated codes stay scannable
/// on small screens.
pub const MAX_REFERENCE_LEN: usize = 140;

/// Payload key holding the seller account.
pub const SELLER_KEY: &str = "seller";
/// Payload key holding the human-readable amount.
pub const AMOUNT_KEY: &str = "amount";
/// Payload key holding the free-text reference.
pub const REFERENCE_KEY: &str = "ref";

/// A request for payment created by a seller.
///
/// The `amount` is expressed in the token's human-readable denomination
/// (`"1.50"` USDC, not `1500000`). Conversion to base units happens on the
/// buyer side, see [`TokenAmount`](crate::amount::TokenAmount).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    seller: String,
    amount: String,
    reference: String,
}

/// Reasons a [`PaymentIntent`] cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    /// No connected account to receive the payment.
    #[error("seller account is empty")]
    EmptySeller,
    /// The amount field was left blank.
    #[error("amount is empty")]
    EmptyAmount,
    /// The reference field was left blank.
    #[error("reference is empty")]
    EmptyReference,
    /// The reference exceeds [`MAX_REFERENCE_LEN`].
    #[error("reference is {0} characters long, maximum is {max}", max = MAX_REFERENCE_LEN)]
    ReferenceTooLong(usize),
}

/// Reasons a scanned payload cannot be turned into a [`PaymentIntent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not a JSON object with string fields.
    #[error("invalid QR code format: {0}")]
    Malformed(String),
    /// A required field is absent or empty.
    #[error("invalid QR code format: missing `{0}`")]
    MissingField(&'static str),
    /// The reference exceeds [`MAX_REFERENCE_LEN`].
    #[error("invalid QR code format: reference is {0} characters long")]
    ReferenceTooLong(usize),
}

impl PaymentIntent {
    /// Creates a new intent, enforcing that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError`] if any field is empty or the reference is too long.
    pub fn new(
        seller: impl Into<String>,
        amount: impl Into<String>,
        reference: impl Into<String>,
    ) -> Result<Self, IntentError> {
        let seller = seller.into();
        let amount = amount.into();
        let reference = reference.into();
        if seller.trim().is_empty() {
            return Err(IntentError::EmptySeller);
        }
        if amount.trim().is_empty() {
            return Err(IntentError::EmptyAmount);
        }
        if reference.trim().is_empty() {
            return Err(IntentError::EmptyReference);
        }
        let len = reference.chars().count();
        if len > MAX_REFERENCE_LEN {
            return Err(IntentError::ReferenceTooLong(len));
        }
        Ok(Self {
            seller,
            amount,
            reference,
        })
    }

    /// Account that receives the payment.
    #[must_use]
    pub fn seller(&self) -> &str {
        &self.seller
    }

    /// Amount in the token's human-readable denomination.
    #[must_use]
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Free-text note attached to the payment. May be empty on scanned intents.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Encodes the intent as a QR payload.
    #[must_use]
    pub fn encode(&self) -> String {
        encode(self)
    }

    /// Parses a scanned QR payload.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        decode(text)
    }
}

/// Encodes an intent as a JSON object with the keys `seller`, `amount` and `ref`.
#[must_use]
pub fn encode(intent: &PaymentIntent) -> String {
    let mut object = Map::with_capacity(3);
    object.insert(SELLER_KEY.into(), Value::String(intent.seller.clone()));
    object.insert(AMOUNT_KEY.into(), Value::String(intent.amount.clone()));
    object.insert(REFERENCE_KEY.into(), Value::String(intent.reference.clone()));
    Value::Object(object).to_string()
}

/// Decodes a QR payload produced by [`encode`].
///
/// `seller` and `amount` are required; a missing `ref` decodes as an empty
/// reference. Unknown keys are ignored.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if the text is not a JSON object or a known
///   field is not a string.
/// - [`DecodeError::MissingField`] if `seller` or `amount` is absent, null or empty.
/// - [`DecodeError::ReferenceTooLong`] if `ref` exceeds [`MAX_REFERENCE_LEN`].
pub fn decode(text: &str) -> Result<PaymentIntent, DecodeError> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(DecodeError::Malformed("payload is not an object".into()));
    };

    let seller = required_field(&object, SELLER_KEY)?;
    let amount = required_field(&object, AMOUNT_KEY)?;
    let reference = optional_field(&object, REFERENCE_KEY)?.unwrap_or_default();

    let len = reference.chars().count();
    if len > MAX_REFERENCE_LEN {
        return Err(DecodeError::ReferenceTooLong(len));
    }

    Ok(PaymentIntent {
        seller,
        amount,
        reference,
    })
}

fn optional_field(object: &Map<String, Value>, key: &'static str) -> Result<Option<String>, DecodeError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::Malformed(format!("`{key}` must be a string"))),
    }
}

fn required_field(object: &Map<String, Value>, key: &'static str) -> Result<String, DecodeError> {
    optional_field(object, key)?
        .filter(|s| !s.trim().is_empty())
        .ok_or(DecodeError::MissingField(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_book_scenario() {
        let intent = PaymentIntent::new("0xABC", "10", "Book").unwrap();
        let decoded = decode(&encode(&intent)).unwrap();
        assert_eq!(decoded, intent);
        assert_eq!(decoded.seller(), "0xABC");
        assert_eq!(decoded.amount(), "10");
        assert_eq!(decoded.reference(), "Book");
    }

    #[test]
    fn test_encode_uses_wire_keys() {
        let intent = PaymentIntent::new("0xABC", "2.5", "Coffee").unwrap();
        let value: Value = serde_json::from_str(&intent.encode()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["seller"], "0xABC");
        assert_eq!(object["amount"], "2.5");
        assert_eq!(object["ref"], "Coffee");
    }

    #[test]
    fn test_roundtrip_escapes_quotes_and_unicode() {
        let intent = PaymentIntent::new("0xABC", "0.99", "Caf\u{e9} \"latte\" \\ 2x").unwrap();
        assert_eq!(PaymentIntent::decode(&intent.encode()).unwrap(), intent);
    }

    #[test]
    fn test_roundtrip_over_generated_fields() {
        let at_limit = "\u{1f600}".repeat(MAX_REFERENCE_LEN);
        let sellers = ["0xABC", "0x00000000000000000000000000000000000000ab", " 0xPadded "];
        let amounts = ["1", "0.000001", "1e3", "  42.50\t"];
        let references = [
            "Book",
            "\"quoted\" 'single'",
            "back\\slash / slash",
            "line\nbreak\ttab",
            "\u{4e2d}\u{6587} \u{0639}\u{0631}\u{0628}\u{064a}",
            "\u{0}control\u{1f}",
            "  surrounding whitespace  ",
            at_limit.as_str(),
        ];
        for seller in sellers {
            for amount in amounts {
                for reference in references {
                    let intent = PaymentIntent::new(seller, amount, reference).unwrap();
                    let decoded = decode(&encode(&intent)).unwrap();
                    assert_eq!(decoded, intent, "{seller:?} {amount:?} {reference:?}");
                }
            }
        }
    }

    #[test]
    fn test_decode_ignores_key_order_and_extra_keys() {
        let decoded =
            decode(r#"{"ref":"Book","extra":1,"amount":"10","seller":"0xABC"}"#).unwrap();
        assert_eq!(decoded, PaymentIntent::new("0xABC", "10", "Book").unwrap());
    }

    #[test]
    fn test_decode_not_json_is_malformed() {
        for text in ["", "hello", "{", "seller=0xABC&amount=10", "https://example.com"] {
            assert!(
                matches!(decode(text), Err(DecodeError::Malformed(_))),
                "expected Malformed for {text:?}"
            );
        }
    }

    #[test]
    fn test_decode_non_object_is_malformed() {
        assert!(matches!(decode("[1,2,3]"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("\"0xABC\""), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode("42"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_wrong_field_type_is_malformed() {
        let result = decode(r#"{"seller":"0xABC","amount":10,"ref":"Book"}"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_missing_seller() {
        let result = decode(r#"{"amount":"10","ref":"Book"}"#);
        assert_eq!(result, Err(DecodeError::MissingField("seller")));
    }

    #[test]
    fn test_decode_missing_amount() {
        let result = decode(r#"{"seller":"0xABC","ref":"Book"}"#);
        assert_eq!(result, Err(DecodeError::MissingField("amount")));
    }

    #[test]
    fn test_decode_empty_amount_counts_as_missing() {
        let result = decode(r#"{"seller":"0xABC","amount":"","ref":"Book"}"#);
        assert_eq!(result, Err(DecodeError::MissingField("amount")));
    }

    #[test]
    fn test_decode_missing_reference_defaults_to_empty() {
        let decoded = decode(r#"{"seller":"0xABC","amount":"10"}"#).unwrap();
        assert_eq!(decoded.reference(), "");
    }

    #[test]
    fn test_decode_rejects_oversized_reference() {
        let long = "x".repeat(MAX_REFERENCE_LEN + 1);
        let text = format!(r#"{{"seller":"0xABC","amount":"10","ref":"{long}"}}"#);
        assert_eq!(
            decode(&text),
            Err(DecodeError::ReferenceTooLong(MAX_REFERENCE_LEN + 1))
        );
    }

    #[test]
    fn test_new_enforces_non_empty_fields() {
        assert_eq!(PaymentIntent::new("", "1", "x"), Err(IntentError::EmptySeller));
        assert_eq!(PaymentIntent::new("0xABC", " ", "x"), Err(IntentError::EmptyAmount));
        assert_eq!(PaymentIntent::new("0xABC", "1", ""), Err(IntentError::EmptyReference));
    }

    #[test]
    fn test_new_reference_length_counts_chars() {
        let at_limit = "\u{e9}".repeat(MAX_REFERENCE_LEN);
        assert!(PaymentIntent::new("0xABC", "1", at_limit).is_ok());
        let over = "a".repeat(MAX_REFERENCE_LEN + 1);
        assert_eq!(
            PaymentIntent::new("0xABC", "1", over),
            Err(IntentError::ReferenceTooLong(MAX_REFERENCE_LEN + 1))
        );
    }
}
