// crates/boleto-client/src/model.rs
// ============================================================================
// Module: Boleto Wire Model
// Description: Request and response bodies exchanged with the orchestrator.
// Purpose: Map Rust types onto the orchestrator's JSON field names.
// Dependencies: rust_decimal, serde, time
// ============================================================================

//! ## Overview
//! Request types serialize with the orchestrator's Portuguese field names.
//! Response types decode leniently: absent or `null` fields fall back to defaults so
//! that harness assertions, not the decoder, decide whether a record is valid.
//! Invariants:
//! - Amounts travel as JSON numbers.
//! - Due dates on requests travel as `YYYY-MM-DD` calendar dates.

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use time::Date;

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

// ============================================================================
// SECTION: Payer
// ============================================================================

/// Payer tax document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// Personal tax id (11 digits).
    #[serde(rename = "CPF")]
    Cpf,
    /// Corporate tax id (14 digits).
    #[serde(rename = "CNPJ")]
    Cnpj,
}

impl DocumentType {
    /// Returns the wire label for the document kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
        }
    }

    /// Number of digits the orchestrator accepts for this document kind.
    #[must_use]
    pub const fn expected_digits(self) -> usize {
        match self {
            Self::Cpf => 11,
            Self::Cnpj => 14,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payer postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line.
    #[serde(rename = "logradouro")]
    pub street: String,
    /// District.
    #[serde(rename = "bairro")]
    pub district: String,
    /// City.
    #[serde(rename = "cidade")]
    pub city: String,
    /// Building number.
    #[serde(rename = "numero")]
    pub number: String,
    /// Two-letter state code.
    #[serde(rename = "uf")]
    pub state: String,
    /// Postal code.
    #[serde(rename = "cep")]
    pub postal_code: String,
}

/// Boleto payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Tax document kind.
    #[serde(rename = "tipoDocumento")]
    pub document_type: DocumentType,
    /// Tax document digits.
    #[serde(rename = "numeroDocumento")]
    pub document_number: String,
    /// Payer name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Payer address.
    #[serde(rename = "endereco")]
    pub address: Address,
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Amount and due date of a boleto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoletoTerms {
    /// Face amount.
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Due date.
    #[serde(rename = "dataVencimento", with = "calendar_date")]
    pub due_date: Date,
}

/// Register endpoint request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBoletoRequest {
    /// Caller-side identifier; must be unique per registration attempt.
    #[serde(rename = "idExterno")]
    pub external_id: String,
    /// Product code.
    #[serde(rename = "codProduto")]
    pub product_code: String,
    /// Payer details.
    #[serde(rename = "pagador")]
    pub payer: Payer,
    /// Amount and due date.
    #[serde(rename = "boleto")]
    pub terms: BoletoTerms,
}

/// Cancel endpoint request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBoletoRequest {
    /// Boleto number to cancel.
    #[serde(rename = "numeroBoleto")]
    pub numero_boleto: String,
}

impl CancelBoletoRequest {
    /// Creates a cancel request for a boleto number.
    #[must_use]
    pub fn new(numero_boleto: impl Into<String>) -> Self {
        Self {
            numero_boleto: numero_boleto.into(),
        }
    }
}

/// Query endpoint parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBoletoParams {
    /// Boleto number to look up.
    pub numero_boleto: String,
    /// Whether the event history is requested; `None` omits the parameter.
    pub buscar_eventos: Option<bool>,
}

impl QueryBoletoParams {
    /// Creates query parameters with an explicit event flag.
    #[must_use]
    pub fn new(numero_boleto: impl Into<String>, buscar_eventos: bool) -> Self {
        Self {
            numero_boleto: numero_boleto.into(),
            buscar_eventos: Some(buscar_eventos),
        }
    }

    /// Returns the query string pairs in wire order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("numeroBoleto", self.numero_boleto.clone())];
        if let Some(flag) = self.buscar_eventos {
            pairs.push(("buscarEventos", flag.to_string()));
        }
        pairs
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Envelope shared by accepted register and cancel responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSuccessEnvelope {
    /// Result code (for example `"202"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub codigo: String,
    /// Human-readable message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mensagem: String,
    /// Correlation identifier echoed by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub correlation_id: String,
}

/// Accepted register response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBoletoResponse {
    /// Common envelope fields.
    #[serde(flatten)]
    pub envelope: ApiSuccessEnvelope,
    /// Boleto number assigned by the orchestrator.
    #[serde(default, deserialize_with = "null_as_default")]
    pub numero_boleto: String,
}

/// Accepted cancel response.
pub type CancelBoletoResponse = ApiSuccessEnvelope;

/// Boleto record returned by the query endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoletoRecord {
    /// Lifecycle status label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Bank-side boleto number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub nosso_numero: String,
    /// Printable PDF location.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url_pdf: String,
    /// Face amount.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "decimal_or_zero"
    )]
    pub valor: Decimal,
    /// Paid amount, when any.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub valor_pago: Option<Decimal>,
    /// Payment timestamp, when paid.
    #[serde(default)]
    pub data_pagamento: Option<String>,
    /// Due date as reported by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_vencimento: String,
    /// Typeable payment line.
    #[serde(default, deserialize_with = "null_as_default")]
    pub linha_digitavel: String,
}

/// Boleto lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoletoEvent {
    /// Status reached by the event.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Event creation timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_criacao: String,
    /// Failure detail, when the event records an error.
    #[serde(default)]
    pub mensagem_erro: Option<String>,
}

/// Successful query response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBoletoResponse {
    /// Boleto record.
    pub boleto: BoletoRecord,
    /// Event history; empty when events were not requested.
    #[serde(default, deserialize_with = "null_as_default")]
    pub boleto_eventos: Vec<BoletoEvent>,
}

/// Field-level validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name, when reported.
    #[serde(default)]
    pub campo: Option<String>,
    /// Failure message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mensagem: String,
}

/// Error envelope returned with 4xx/5xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorEnvelope {
    /// Error code (for example `"4001000"`).
    #[serde(default)]
    pub codigo: Option<String>,
    /// Human-readable message; required, but `null` reads as empty.
    #[serde(deserialize_with = "null_as_default")]
    pub mensagem: String,
    /// Correlation identifier, when echoed.
    #[serde(default)]
    pub correlation_id: Option<String>,
    /// Field-level errors.
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

// ============================================================================
// SECTION: Lenient Decoding
// ============================================================================

/// Reads an absent-or-`null` value as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a numeric amount, mapping `null` to zero.
fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::float_option::deserialize(deserializer).map(Option::unwrap_or_default)
}
