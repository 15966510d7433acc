// crates/boleto-harness/src/builder.rs
// ============================================================================
// Module: Test Data Builder
// Description: Valid and deliberately invalid register payloads.
// Purpose: Give each test case a payload the orchestrator will not dedupe.
// Dependencies: boleto-client, rand, rust_decimal, serde_json, time
// ============================================================================

//! ## Overview
//! The orchestrator derives the boleto number from the external id, payer,
//! amount and due date, so payloads that must create a new boleto come from
//! [`TestDataBuilder::unique_register_payload`]: fresh external id and CPF
//! on every call. The fixed payload stays available for validation cases
//! where the server rejects the request before deduplication.

// ============================================================================
// SECTION: Imports
// ============================================================================

use boleto_client::Address;
use boleto_client::BoletoTerms;
use boleto_client::DocumentType;
use boleto_client::Payer;
use boleto_client::RegisterBoletoRequest;
use rand::Rng;
use rust_decimal::Decimal;
use serde_json::Value;
use time::Date;
use time::Duration;
use time::OffsetDateTime;
use time::macros::date;

use crate::document::generate_cpf_with;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// External id used by the fixed payload.
pub const DEFAULT_EXTERNAL_ID: &str = "PPOOAC2";
/// Product code used by every payload.
pub const DEFAULT_PRODUCT_CODE: &str = "1";
/// CPF of the default payer.
pub const DEFAULT_CPF: &str = "51099188806";
/// CNPJ of the corporate payer.
pub const DEFAULT_CNPJ: &str = "12345678000195";
/// Days between "today" and the default due date.
pub const DEFAULT_DUE_IN_DAYS: i64 = 60;
/// Days from today until the high-value due date.
pub const HIGH_VALUE_DUE_IN_DAYS: i64 = 365;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// ============================================================================
// SECTION: Required Fields
// ============================================================================

/// Top-level register field that validation tests remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// `idExterno`.
    ExternalId,
    /// `codProduto`.
    ProductCode,
    /// `pagador`.
    Payer,
    /// `boleto`.
    Terms,
}

impl RequiredField {
    /// All required top-level fields.
    pub const ALL: [Self; 4] = [Self::ExternalId, Self::ProductCode, Self::Payer, Self::Terms];

    /// JSON key of the field.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::ExternalId => "idExterno",
            Self::ProductCode => "codProduto",
            Self::Payer => "pagador",
            Self::Terms => "boleto",
        }
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builds register payloads relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDataBuilder {
    /// Date the default due date is computed from.
    today: Date,
}

impl Default for TestDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataBuilder {
    /// Creates a builder anchored at the current UTC date.
    #[must_use]
    pub fn new() -> Self {
        Self::with_today(OffsetDateTime::now_utc().date())
    }

    /// Creates a builder anchored at a fixed date.
    #[must_use]
    pub const fn with_today(today: Date) -> Self {
        Self {
            today,
        }
    }

    /// Default payer address.
    #[must_use]
    pub fn address(&self) -> Address {
        Address {
            street: "R. Guaianases, 1238".to_string(),
            district: "Campos Elíseos".to_string(),
            city: "São Paulo".to_string(),
            number: "102".to_string(),
            state: "SP".to_string(),
            postal_code: "01204-002".to_string(),
        }
    }

    /// Individual payer with the default CPF.
    #[must_use]
    pub fn cpf_payer(&self) -> Payer {
        self.payer(DocumentType::Cpf, DEFAULT_CPF)
    }

    /// Corporate payer with the default CNPJ.
    #[must_use]
    pub fn cnpj_payer(&self) -> Payer {
        Payer {
            name: "Empresa LTDA".to_string(),
            ..self.payer(DocumentType::Cnpj, DEFAULT_CNPJ)
        }
    }

    /// Payer with an arbitrary document, used for length validation cases.
    #[must_use]
    pub fn payer(&self, document_type: DocumentType, document_number: &str) -> Payer {
        Payer {
            document_type,
            document_number: document_number.to_string(),
            name: "João Silva".to_string(),
            address: self.address(),
        }
    }

    /// Default terms: 1585.30 due sixty days after the reference date.
    #[must_use]
    pub fn default_terms(&self) -> BoletoTerms {
        BoletoTerms {
            amount: Decimal::new(158_530, 2),
            due_date: self.today.saturating_add(Duration::days(DEFAULT_DUE_IN_DAYS)),
        }
    }

    /// High-value terms: 999999.99 due one year after `today`.
    #[must_use]
    pub fn high_value_terms(&self) -> BoletoTerms {
        BoletoTerms {
            amount: Decimal::new(99_999_999, 2),
            due_date: self.today.saturating_add(Duration::days(HIGH_VALUE_DUE_IN_DAYS)),
        }
    }

    /// Negative amount with the default due date.
    #[must_use]
    pub fn negative_amount_terms(&self) -> BoletoTerms {
        BoletoTerms {
            amount: Decimal::new(-100, 0),
            ..self.default_terms()
        }
    }

    /// Positive amount due in the past.
    #[must_use]
    pub fn past_due_terms(&self) -> BoletoTerms {
        BoletoTerms {
            amount: Decimal::new(100, 0),
            due_date: date!(2020 - 01 - 01),
        }
    }

    /// Fixed register payload. Registering it twice triggers duplicate detection.
    #[must_use]
    pub fn register_payload(&self) -> RegisterBoletoRequest {
        RegisterBoletoRequest {
            external_id: DEFAULT_EXTERNAL_ID.to_string(),
            product_code: DEFAULT_PRODUCT_CODE.to_string(),
            payer: self.cpf_payer(),
            terms: self.default_terms(),
        }
    }

    /// Register payload with a fresh external id and CPF.
    #[must_use]
    pub fn unique_register_payload(&self) -> RegisterBoletoRequest {
        self.unique_register_payload_with(&mut rand::thread_rng())
    }

    /// Register payload with a fresh external id and CPF from the supplied RNG.
    #[must_use]
    pub fn unique_register_payload_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> RegisterBoletoRequest {
        let mut payload = self.register_payload();
        payload.external_id = generate_external_id_with(rng);
        payload.payer.document_number = generate_cpf_with(rng);
        payload
    }

    /// Fixed register payload as JSON with one required field removed.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload fails to serialize.
    pub fn payload_without(&self, field: RequiredField) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(self.register_payload())?;
        if let Value::Object(map) = &mut value {
            map.remove(field.wire_name());
        }
        Ok(value)
    }
}

// ============================================================================
// SECTION: External Ids
// ============================================================================

/// Generates `EXT-<unix millis in base36>-<8 random base36 chars>`.
#[must_use]
pub fn generate_external_id() -> String {
    generate_external_id_with(&mut rand::thread_rng())
}

/// Generates an external id using the supplied RNG for the random suffix.
#[must_use]
pub fn generate_external_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let millis = u128::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)
        .unwrap_or_default();
    let suffix: String =
        (0 .. 8).map(|_| char::from(BASE36[rng.gen_range(0 .. BASE36.len())])).collect();
    format!("EXT-{}-{suffix}", to_base36(millis))
}

/// Lowercase base-36 rendering of `value`.
fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let index = usize::try_from(value % 36).unwrap_or_default();
        digits.push(char::from(BASE36[index]));
        value /= 36;
    }
    digits.iter().rev().collect()
}
