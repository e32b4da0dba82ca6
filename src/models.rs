// Wire types for the banking backend
// Field names on the wire are Portuguese; Rust names are English

use crate::formatting::{format_currency, format_date};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Value of `tipo` for money received
pub const TIPO_RECEBIDA: &str = "recebida";

// ============================================================================
// ACCOUNT CREATION
// ============================================================================

/// Body of `POST /contas`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(rename = "nome")]
    pub name: String,

    /// Masked, `XXX.XXX.XXX-XX`
    #[serde(rename = "cpf")]
    pub tax_id: String,

    #[serde(rename = "apelido")]
    pub nickname: String,

    #[serde(rename = "senha")]
    pub password: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("name", &self.name)
            .field("tax_id", &self.tax_id)
            .field("nickname", &self.nickname)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Error body returned by the backend on a failed request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// BALANCE & TRANSACTIONS
// ============================================================================

/// Body of `GET /contas/saldo`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "saldo", deserialize_with = "de_amount")]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    #[serde(rename = "apelido")]
    pub nickname: String,

    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Incoming => "↓",
            Direction::Outgoing => "↑",
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            Direction::Incoming => "+",
            Direction::Outgoing => "-",
        }
    }
}

/// One entry of `GET /transferencias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,

    #[serde(rename = "categoria")]
    pub category: String,

    #[serde(rename = "contraparte")]
    pub counterparty: Counterparty,

    /// ISO date string as sent by the backend
    #[serde(rename = "data")]
    pub date: String,

    #[serde(rename = "descricao")]
    pub description: String,

    #[serde(rename = "tipo")]
    pub kind: String,

    #[serde(rename = "valor", deserialize_with = "de_amount")]
    pub amount: f64,
}

impl Transaction {
    pub fn direction(&self) -> Direction {
        if self.kind == TIPO_RECEBIDA {
            Direction::Incoming
        } else {
            Direction::Outgoing
        }
    }

    pub fn is_incoming(&self) -> bool {
        self.direction() == Direction::Incoming
    }

    /// `De: ana` for money received, `Para: ana` otherwise
    pub fn counterparty_label(&self) -> String {
        match self.direction() {
            Direction::Incoming => format!("De: {}", self.counterparty.nickname),
            Direction::Outgoing => format!("Para: {}", self.counterparty.nickname),
        }
    }

    /// Amount with its sign, e.g. `+R$ 10,00`
    pub fn signed_amount(&self) -> String {
        format!("{}{}", self.direction().sign(), format_currency(self.amount))
    }

    pub fn display_date(&self) -> String {
        format_date(&self.date)
    }

    /// Body of the details alert shown when a transaction is selected
    pub fn detail_text(&self) -> String {
        format!(
            "Transação: {}\nValor: {}\nData: {}",
            self.description,
            format_currency(self.amount),
            self.display_date()
        )
    }
}

// ============================================================================
// USER & SESSION
// ============================================================================

/// Authenticated user as returned by the backend at login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "apelido")]
    pub nickname: String,

    #[serde(rename = "cpf")]
    pub tax_id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,

    #[serde(rename = "endereco", default)]
    pub address: Option<String>,

    #[serde(rename = "dataNascimento", default)]
    pub birth_date: Option<String>,

    #[serde(rename = "saldo", default, deserialize_with = "de_amount")]
    pub balance: f64,

    #[serde(rename = "tipoConta", default)]
    pub account_type: String,

    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,

    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl User {
    /// First letter of the name, for the avatar
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('U')
    }

    /// `Cliente desde` date
    pub fn customer_since(&self) -> Option<String> {
        self.created_at.as_deref().map(format_date)
    }
}

/// Bearer token plus the user it belongs to. An empty token means signed out.
#[derive(Clone, Default)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<User>) -> Self {
        Session {
            token: token.into(),
            user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn sign_out(&mut self) {
        self.token.clear();
        self.user = None;
    }

    pub fn display_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &if self.token.is_empty() { "" } else { "[REDACTED]" })
            .field("user", &self.user)
            .finish()
    }
}

// Decimal columns sometimes arrive as strings ("12.50"); accept both.
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_transaction(kind: &str) -> Transaction {
        Transaction {
            id: 7,
            category: "PIX".to_string(),
            counterparty: Counterparty {
                nickname: "bia".to_string(),
                name: "Beatriz".to_string(),
            },
            date: "2024-03-05".to_string(),
            description: "Almoço".to_string(),
            kind: kind.to_string(),
            amount: 42.5,
        }
    }

    #[test]
    fn test_new_account_wire_names() {
        let payload = NewAccount {
            name: "Ana".to_string(),
            tax_id: "123.456.789-00".to_string(),
            nickname: "ana".to_string(),
            password: "secret".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"nome": "Ana", "cpf": "123.456.789-00", "apelido": "ana", "senha": "secret"})
        );
        assert!(!format!("{:?}", payload).contains("secret"));
    }

    #[test]
    fn test_transaction_deserialize() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 1,
            "categoria": "PIX",
            "contraparte": {"apelido": "bia", "nome": "Beatriz"},
            "data": "2024-03-05T12:00:00.000Z",
            "descricao": "Almoço",
            "tipo": "recebida",
            "valor": 10
        }))
        .unwrap();

        assert_eq!(tx.amount, 10.0);
        assert!(tx.is_incoming());
        assert_eq!(tx.counterparty.nickname, "bia");
    }

    #[test]
    fn test_amount_as_string() {
        let balance: Balance = serde_json::from_value(json!({"saldo": "150.75"})).unwrap();
        assert_eq!(balance.amount, 150.75);

        assert!(serde_json::from_value::<Balance>(json!({"saldo": "abc"})).is_err());
    }

    #[test]
    fn test_transaction_direction_labels() {
        let incoming = create_test_transaction("recebida");
        assert_eq!(incoming.direction().arrow(), "↓");
        assert_eq!(incoming.counterparty_label(), "De: bia");
        assert_eq!(incoming.signed_amount(), "+R$ 42,50");

        let outgoing = create_test_transaction("enviada");
        assert_eq!(outgoing.direction().arrow(), "↑");
        assert_eq!(outgoing.counterparty_label(), "Para: bia");
        assert_eq!(outgoing.signed_amount(), "-R$ 42,50");
    }

    #[test]
    fn test_transaction_detail_text() {
        let tx = create_test_transaction("recebida");
        assert_eq!(
            tx.detail_text(),
            "Transação: Almoço\nValor: R$ 42,50\nData: 05/03/2024"
        );
    }

    #[test]
    fn test_user_profile() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "nome": "Ana Souza",
            "apelido": "ana",
            "cpf": "123.456.789-00",
            "email": null,
            "telefone": null,
            "endereco": null,
            "dataNascimento": null,
            "saldo": 0,
            "tipoConta": "corrente",
            "createdAt": "2023-01-10T09:00:00.000Z",
            "updatedAt": "2023-01-10T09:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(user.initial(), 'A');
        assert_eq!(user.customer_since().as_deref(), Some("10/01/2023"));
    }

    #[test]
    fn test_session_sign_out() {
        let mut session = Session::new("s3cr3t-bearer", None);
        assert!(session.is_authenticated());
        let debug = format!("{:?}", session);
        assert!(!debug.contains("s3cr3t-bearer"));
        assert!(debug.contains("[REDACTED]"));

        session.sign_out();
        assert!(!session.is_authenticated());
        assert_eq!(session.display_name(), "");
    }
}
