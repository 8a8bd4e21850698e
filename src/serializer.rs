use chrono::NaiveDate;

use crate::errors::{BySquareError, Result};
use crate::models::{
    BankAccount, Beneficiary, DataModel, DirectDebit, PaymentType, Periodicity, SimplePayment,
    StandingOrder,
};

/// Serializes the model into the tab-separated payload.
///
/// Field order is the contract of the format: header fields, then one block
/// per payment (base fields, bank accounts, extension markers), then a
/// second pass with one beneficiary triplet per payment.
pub fn serialize(model: &DataModel) -> Result<String> {
    let mut parts: Vec<String> = Vec::with_capacity(2 + model.payments.len() * 20);

    parts.push(text_field("invoiceId", model.invoice_id.as_deref())?);
    parts.push(model.payments.len().to_string());

    for payment in &model.payments {
        parts.push(u8::from(payment.payment_type).to_string());
        parts.push(payment.amount.map(format_amount).unwrap_or_default());
        parts.push(text_field("currencyCode", payment.currency_code.as_deref())?);
        parts.push(opt_wire_date(payment.payment_due_date));
        parts.push(text_field("variableSymbol", payment.variable_symbol.as_deref())?);
        parts.push(text_field("constantSymbol", payment.constant_symbol.as_deref())?);
        parts.push(text_field("specificSymbol", payment.specific_symbol.as_deref())?);
        parts.push(text_field(
            "originatorsReferenceInformation",
            payment.originators_reference_information.as_deref(),
        )?);
        parts.push(text_field("paymentNote", payment.payment_note.as_deref())?);

        parts.push(payment.bank_accounts.len().to_string());
        for account in &payment.bank_accounts {
            parts.push(text_field("iban", Some(&account.iban))?);
            parts.push(text_field("bic", account.bic.as_deref())?);
        }

        match (payment.payment_type, &payment.standing_order_ext) {
            (PaymentType::StandingOrder, Some(ext)) => {
                parts.push("1".to_string());
                parts.push(ext.day.to_string());
                parts.push(ext.month.to_string());
                parts.push(ext.periodicity.as_letter().to_string());
                parts.push(opt_wire_date(ext.last_date));
            }
            _ => parts.push("0".to_string()),
        }

        match (payment.payment_type, &payment.direct_debit_ext) {
            (PaymentType::DirectDebit, Some(ext)) => {
                parts.push("1".to_string());
                parts.push(ext.direct_debit_scheme.to_string());
                parts.push(ext.direct_debit_type.to_string());
                parts.push(text_field("variableSymbol", ext.variable_symbol.as_deref())?);
                parts.push(text_field("specificSymbol", ext.specific_symbol.as_deref())?);
                parts.push(text_field(
                    "originatorsReferenceInformation",
                    ext.originators_reference_information.as_deref(),
                )?);
                parts.push(text_field("mandateId", ext.mandate_id.as_deref())?);
                parts.push(text_field("creditorId", ext.creditor_id.as_deref())?);
                parts.push(text_field("contractId", ext.contract_id.as_deref())?);
                parts.push(text_field("maxAmount", ext.max_amount.as_deref())?);
                parts.push(opt_wire_date(ext.valid_till_date));
            }
            _ => parts.push("0".to_string()),
        }
    }

    for payment in &model.payments {
        match &payment.beneficiary {
            Some(beneficiary) => {
                parts.push(text_field("beneficiary.name", Some(&beneficiary.name))?);
                parts.push(text_field("beneficiary.street", beneficiary.street.as_deref())?);
                parts.push(text_field("beneficiary.city", beneficiary.city.as_deref())?);
            }
            None => parts.extend([String::new(), String::new(), String::new()]),
        }
    }

    Ok(parts.join("\t"))
}

/// Parses a tab-separated payload back into the model. The inverse of
/// [`serialize`], driven by the embedded counts. Payloads from producers
/// that predate the beneficiary fields decode with `beneficiary: None`.
pub fn deserialize(payload: &str) -> Result<DataModel> {
    let mut fields = Fields::new(payload);

    let invoice_id = non_empty(fields.next("invoiceId")?);
    let payments_count = parse_count(fields.next("payments count")?)?;

    let mut payments = Vec::with_capacity(payments_count.min(fields.remaining()));
    for _ in 0..payments_count {
        payments.push(deserialize_payment(&mut fields)?);
    }

    for payment in &mut payments {
        if fields.remaining() < 3 {
            // Older producers omit the trailing beneficiary triplets.
            break;
        }

        let name = fields.next("beneficiary.name")?.to_string();
        let street = non_empty(fields.next("beneficiary.street")?);
        let city = non_empty(fields.next("beneficiary.city")?);

        if !name.is_empty() || street.is_some() || city.is_some() {
            payment.beneficiary = Some(Beneficiary { name, street, city });
        }
    }

    Ok(DataModel {
        invoice_id,
        payments,
    })
}

fn deserialize_payment(fields: &mut Fields<'_>) -> Result<SimplePayment> {
    let payment_type = parse_payment_type(fields.next("type")?)?;
    let amount = parse_amount(fields.next("amount")?)?;
    let currency_code = non_empty(fields.next("currencyCode")?);
    let payment_due_date = parse_opt_wire_date(fields.next("paymentDueDate")?)?;
    let variable_symbol = non_empty(fields.next("variableSymbol")?);
    let constant_symbol = non_empty(fields.next("constantSymbol")?);
    let specific_symbol = non_empty(fields.next("specificSymbol")?);
    let originators_reference_information =
        non_empty(fields.next("originatorsReferenceInformation")?);
    let payment_note = non_empty(fields.next("paymentNote")?);

    let accounts_count = parse_count(fields.next("bank accounts count")?)?;
    let mut bank_accounts = Vec::with_capacity(accounts_count.min(fields.remaining()));
    for _ in 0..accounts_count {
        let iban = fields.next("iban")?;
        if iban.is_empty() {
            return Err(BySquareError::MissingBankAccount);
        }
        let bic = non_empty(fields.next("bic")?);
        bank_accounts.push(BankAccount {
            iban: iban.to_string(),
            bic,
        });
    }

    let standing_order_ext = match fields.next("standing order marker")? {
        "0" => None,
        "1" => {
            if payment_type != PaymentType::StandingOrder {
                return Err(BySquareError::Deserialization(
                    "standing order extension on a non-standing-order payment".to_string(),
                ));
            }
            Some(deserialize_standing_order(fields)?)
        }
        other => {
            return Err(BySquareError::Deserialization(format!(
                "invalid standing order marker: {other:?}"
            )))
        }
    };

    let direct_debit_ext = match fields.next("direct debit marker")? {
        "0" => None,
        "1" => {
            if payment_type != PaymentType::DirectDebit {
                return Err(BySquareError::Deserialization(
                    "direct debit extension on a non-direct-debit payment".to_string(),
                ));
            }
            Some(deserialize_direct_debit(fields)?)
        }
        other => {
            return Err(BySquareError::Deserialization(format!(
                "invalid direct debit marker: {other:?}"
            )))
        }
    };

    Ok(SimplePayment {
        payment_type,
        amount,
        currency_code,
        payment_due_date,
        variable_symbol,
        constant_symbol,
        specific_symbol,
        originators_reference_information,
        payment_note,
        bank_accounts,
        beneficiary: None,
        standing_order_ext,
        direct_debit_ext,
    })
}

fn deserialize_standing_order(fields: &mut Fields<'_>) -> Result<StandingOrder> {
    let day = parse_number::<u8>(fields.next("day")?, "day")?;
    let month = parse_number::<u16>(fields.next("month")?, "month")?;
    let periodicity_letter = fields.next("periodicity")?;
    let periodicity = Periodicity::from_letter(periodicity_letter).ok_or_else(|| {
        BySquareError::Deserialization(format!("invalid periodicity: {periodicity_letter:?}"))
    })?;
    let last_date = parse_opt_wire_date(fields.next("lastDate")?)?;

    Ok(StandingOrder {
        day,
        month,
        periodicity,
        last_date,
    })
}

fn deserialize_direct_debit(fields: &mut Fields<'_>) -> Result<DirectDebit> {
    Ok(DirectDebit {
        direct_debit_scheme: parse_number(fields.next("directDebitScheme")?, "directDebitScheme")?,
        direct_debit_type: parse_number(fields.next("directDebitType")?, "directDebitType")?,
        variable_symbol: non_empty(fields.next("variableSymbol")?),
        specific_symbol: non_empty(fields.next("specificSymbol")?),
        originators_reference_information: non_empty(
            fields.next("originatorsReferenceInformation")?,
        ),
        mandate_id: non_empty(fields.next("mandateId")?),
        creditor_id: non_empty(fields.next("creditorId")?),
        contract_id: non_empty(fields.next("contractId")?),
        max_amount: non_empty(fields.next("maxAmount")?),
        valid_till_date: parse_opt_wire_date(fields.next("validTillDate")?)?,
    })
}

/// Sequential reader over the tab-split payload.
struct Fields<'a> {
    parts: Vec<&'a str>,
    pos: usize,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a str) -> Self {
        Fields {
            parts: payload.split('\t').collect(),
            pos: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        let part = self
            .parts
            .get(self.pos)
            .copied()
            .ok_or_else(|| BySquareError::Deserialization(format!("missing field: {what}")))?;
        self.pos += 1;
        Ok(part)
    }

    fn remaining(&self) -> usize {
        self.parts.len() - self.pos
    }
}

fn text_field(name: &str, value: Option<&str>) -> Result<String> {
    let value = value.unwrap_or("");
    if value.contains('\t') {
        return Err(BySquareError::Serialization(format!(
            "{name} contains a tab character"
        )));
    }
    Ok(value.to_string())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Shortest decimal form without trailing zeros: `100`, `100.5`, `0.01`.
/// Zero means "amount left to the payer" and is elided entirely.
fn format_amount(amount: f64) -> String {
    if amount == 0.0 {
        String::new()
    } else {
        format!("{amount}")
    }
}

fn parse_amount(value: &str) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    let amount: f64 = value
        .parse()
        .map_err(|_| BySquareError::Deserialization(format!("invalid amount: {value:?}")))?;
    Ok(Some(amount))
}

fn parse_count(value: &str) -> Result<usize> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| BySquareError::Deserialization(format!("invalid count: {value:?}")))
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| BySquareError::Deserialization(format!("invalid {what}: {value:?}")))
}

fn parse_payment_type(value: &str) -> Result<PaymentType> {
    let raw: u8 = parse_number(value, "payment type")?;
    PaymentType::try_from(raw).map_err(BySquareError::Deserialization)
}

/// Dates travel as `YYYYMMDD`; the model keeps them typed.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn opt_wire_date(date: Option<NaiveDate>) -> String {
    date.map(format_wire_date).unwrap_or_default()
}

/// Parses a `YYYYMMDD` wire date, enforcing calendar validity.
pub fn parse_wire_date(value: &str) -> Result<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BySquareError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|_| BySquareError::InvalidDate(value.to_string()))
}

fn parse_opt_wire_date(value: &str) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_wire_date(value).map(Some)
}
