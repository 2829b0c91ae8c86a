use serde::{Deserialize, Serialize};

/// Smallest accepted age.
pub const MIN_AGE: u32 = 0;
/// Largest accepted age.
pub const MAX_AGE: u32 = 150;

/// A person record as owned by the server. The `id` is assigned server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub nome: String,
    pub idade: u32,
}

impl Person {
    pub fn new(id: u64, nome: impl Into<String>, idade: u32) -> Self {
        Self {
            id,
            nome: nome.into(),
            idade,
        }
    }
}

/// Request body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInput {
    pub nome: String,
    pub idade: u32,
}

impl PersonInput {
    pub fn new(nome: impl Into<String>, idade: u32) -> Self {
        Self {
            nome: nome.into(),
            idade,
        }
    }
}

/// The `{ success, data, message }` wrapper every endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl Envelope<()> {
    pub fn message_only(success: bool, message: impl Into<String>) -> Self {
        Self {
            success: Some(success),
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_uses_wire_field_names() {
        let json = serde_json::to_value(Person::new(1, "Ana", 30)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["nome"], "Ana");
        assert_eq!(json["idade"], 30);
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let env: Envelope<Vec<Person>> =
            serde_json::from_str(r#"{"success": true, "message": "ok"}"#).unwrap();
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("ok"));
    }

    #[test]
    fn envelope_reads_list() {
        let env: Envelope<Vec<Person>> =
            serde_json::from_str(r#"{"data": [{"id": 1, "nome": "Ana", "idade": 30}]}"#).unwrap();
        assert_eq!(env.data.unwrap(), vec![Person::new(1, "Ana", 30)]);
    }
}
