//! `key=value` arguments for filling a single form

use crate::{BatchError, Result};
use chrono::NaiveDate;
use form_filler::{load_layout, FormFiller, FormLayout, FormRecord};
use std::collections::HashMap;
use std::path::PathBuf;

/// Keys that must be present, checked in this order
pub const REQUIRED_ARGS: [&str; 7] = [
    "input_pdf",
    "output_pdf",
    "borrower_name",
    "authorized_signatory",
    "business_day",
    "margin_amount",
    "interest_rate",
];

/// Collect `key=value` tokens
///
/// Splits at the first `=`. Tokens without one are ignored and a repeated
/// key keeps its last value.
pub fn parse_key_values<I, S>(tokens: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| {
            token
                .as_ref()
                .split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Parsed single-form invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillArgs {
    pub input_pdf: PathBuf,
    pub output_pdf: PathBuf,
    pub record: FormRecord,
    /// Optional layout file
    pub layout: Option<PathBuf>,
}

impl FillArgs {
    /// Build from command-line tokens
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = parse_key_values(tokens);

        if let Some(missing) = REQUIRED_ARGS.iter().find(|key| !args.contains_key(**key)) {
            return Err(BatchError::ArgumentError(format!(
                "Missing required argument: {missing}"
            )));
        }

        let mut take = |key: &str| args.remove(key).unwrap_or_default();
        let input_pdf = PathBuf::from(take("input_pdf"));
        let output_pdf = PathBuf::from(take("output_pdf"));
        let record = FormRecord::new()
            .borrower_name(take("borrower_name"))
            .authorized_signatory(take("authorized_signatory"))
            .business_day(take("business_day"))
            .margin_amount(take("margin_amount"))
            .selector_value(take("interest_rate"));

        Ok(Self {
            input_pdf,
            output_pdf,
            record,
            layout: args.remove("layout").map(PathBuf::from),
        })
    }
}

/// Fill one form and write it to `output_pdf`
///
/// Nothing is written unless filling succeeds.
pub fn run_fill(args: &FillArgs, today: NaiveDate) -> Result<PathBuf> {
    let layout = match &args.layout {
        Some(path) => load_layout(path)?,
        None => FormLayout::credit_agreement(),
    };
    let filler = FormFiller::new(layout)?;

    let filled = filler.fill_file(&args.input_pdf, &args.record, today)?;
    filled.save(&args.output_pdf)?;

    tracing::info!(
        output = %args.output_pdf.display(),
        pages = filled.page_count(),
        "wrote filled form"
    );
    Ok(args.output_pdf.clone())
}
