//! Functions to load and save the ledger's tabular file format.
//!
//! The format is a UTF-8, comma-delimited file with the header
//! `Date,Category,Amount,Currency,Description` followed by one record per
//! row. Rows carry no ID, owner or kind: loaded rows become expense
//! builders for the owner the caller names, ready to be imported into a
//! [TransactionStore](crate::stores::TransactionStore).

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    models::{Transaction, TransactionBuilder, Username},
};

/// The column headers of the tabular file format.
pub const HEADER: [&str; 5] = ["Date", "Category", "Amount", "Currency", "Description"];

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// How to handle rows that cannot be parsed when loading a file.
///
/// The default is [RowPolicy::Skip]: malformed rows are logged at the warn
/// level and dropped, and every well-formed row is still loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// Log the offending row and continue with the rest of the file.
    #[default]
    Skip,
    /// Stop at the first malformed row and return [Error::InvalidCsv].
    FailFast,
}

/// Parses transactions from CSV `text` and assigns them to `owner`.
///
/// Returns a builder per well-formed row, in file order, or an empty vector
/// if the file holds only the header.
///
/// # Errors
/// This function will return an [Error::InvalidCsv] if the header row is
/// missing or wrong, or, when `policy` is [RowPolicy::FailFast], if any row
/// cannot be parsed.
pub fn parse_csv(
    text: &str,
    owner: Username,
    policy: RowPolicy,
) -> Result<Vec<TransactionBuilder>, Error> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?;

    if headers.iter().ne(HEADER) {
        return Err(Error::InvalidCsv(format!(
            "expected header \"{}\", got \"{}\"",
            HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut builders = Vec::new();

    for (index, record) in reader.records().enumerate() {
        // The header occupies row one.
        let row_number = index + 2;

        match parse_record(record, row_number, &owner) {
            Ok(builder) => builders.push(builder),
            Err(error) => match policy {
                RowPolicy::Skip => {
                    tracing::warn!("skipping malformed row: {error}");
                }
                RowPolicy::FailFast => return Err(error),
            },
        }
    }

    Ok(builders)
}

/// Loads transactions for `owner` from the CSV file at `path`.
///
/// # Errors
/// This function will return an [Error::Io] if the file cannot be read, or
/// an [Error::InvalidCsv] per the rules of [parse_csv].
pub fn load_csv(
    path: impl AsRef<Path>,
    owner: Username,
    policy: RowPolicy,
) -> Result<Vec<TransactionBuilder>, Error> {
    let text = fs::read_to_string(path)?;

    parse_csv(&text, owner, policy)
}

/// Saves `transactions` to the CSV file at `path`, replacing any existing
/// file as a whole.
///
/// The records are written to a sibling temporary file which is synced and
/// then renamed over `path`, so a failure part-way through leaves any
/// previous file untouched. The format has no kind column; income records
/// are written like expenses and will load back as expenses.
///
/// # Errors
/// This function will return an [Error::Io] if the file cannot be written.
pub fn save_csv(transactions: &[Transaction], path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    // The temporary file must live in the same directory as `path` for the
    // rename to be atomic.
    let temp_path = path.with_extension("tmp");

    let result = write_and_rename(transactions, &temp_path, path);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn write_and_rename(
    transactions: &[Transaction],
    temp_path: &Path,
    path: &Path,
) -> Result<(), Error> {
    let file = File::create(temp_path)?;
    let mut writer = ::csv::Writer::from_writer(BufWriter::new(file));

    writer
        .write_record(HEADER)
        .map_err(|error| Error::Io(error.to_string()))?;

    for transaction in transactions {
        let date = transaction
            .date()
            .format(&DATE_FORMAT)
            .map_err(|error| Error::Io(error.to_string()))?;

        writer
            .write_record([
                date.as_str(),
                transaction.category(),
                &transaction.amount().to_string(),
                transaction.currency().as_str(),
                transaction.description(),
            ])
            .map_err(|error| Error::Io(error.to_string()))?;
    }

    writer.flush()?;

    let file = writer
        .into_inner()
        .map_err(|error| Error::Io(error.to_string()))?
        .into_inner()
        .map_err(|error| Error::Io(error.to_string()))?;
    file.sync_all()?;

    fs::rename(temp_path, path)?;

    Ok(())
}

fn parse_record(
    record: Result<::csv::StringRecord, ::csv::Error>,
    row_number: usize,
    owner: &Username,
) -> Result<TransactionBuilder, Error> {
    let record = record.map_err(|error| Error::InvalidCsv(error.to_string()))?;

    let field = |index: usize, name: &str| {
        record
            .get(index)
            .ok_or_else(|| Error::InvalidCsv(format!("row {row_number} is missing {name}")))
    };

    let date = Date::parse(field(0, "a date")?, &DATE_FORMAT).map_err(|error| {
        Error::InvalidCsv(format!(
            "could not parse \"{}\" as a date on row {row_number}: {error}",
            record.get(0).unwrap_or_default()
        ))
    })?;

    let category = field(1, "a category")?;

    let amount: f64 = field(2, "an amount")?.parse().map_err(|error| {
        Error::InvalidCsv(format!(
            "could not parse \"{}\" as an amount on row {row_number}: {error}",
            record.get(2).unwrap_or_default()
        ))
    })?;

    let currency = field(3, "a currency")?
        .parse()
        .map_err(|error| Error::InvalidCsv(format!("row {row_number}: {error}")))?;

    // The description column is optional.
    let description = record.get(4).unwrap_or_default();

    let builder = TransactionBuilder::new(amount, owner.clone())
        .map_err(|error| Error::InvalidCsv(format!("row {row_number}: {error}")))?
        .date(date)
        .category(category)
        .currency(currency)
        .description(description);

    Ok(builder)
}
