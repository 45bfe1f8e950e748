//! Binary model persistence.
//!
//! The file layout is headerless and fixed, compatible with the historical
//! format: seven `u64` configuration fields (`pad_zeros`, `num_inputs_total`,
//! `bits_per_input`, `num_classes`, `filter_inputs`, `filter_entries`,
//! `filter_hashes`), one `u8` bleach, the input order (`num_inputs_total`
//! `u64`s), the hash-parameter matrix (stride `u64` + flat `u64` data), and
//! the counter tensor (two stride `u64`s + flat `u64` data). All integers are
//! little-endian. There is no version tag or checksum; readers re-derive all
//! buffer sizes from the leading fields and validate them before reading, so
//! truncated or inconsistent files fail with an explicit error instead of
//! yielding a half-initialized model.

use crate::error::{Result, SabioError};
use crate::primitives::{Matrix, Tensor3};
use crate::wisard::permutation::InputPermutation;
use crate::wisard::WisardClassifier;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_u64_vec<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u64>> {
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(read_u64(reader)?);
    }
    Ok(values)
}

/// Serializes a model to a writer in the fixed binary layout.
///
/// # Errors
///
/// Returns an error on write failure.
pub fn write_model<W: Write>(model: &WisardClassifier, writer: &mut W) -> Result<()> {
    write_u64(writer, model.pad_zeros() as u64)?;
    write_u64(writer, model.num_inputs_total() as u64)?;
    write_u64(writer, model.bits_per_input() as u64)?;
    write_u64(writer, model.num_classes() as u64)?;
    write_u64(writer, model.filter_inputs() as u64)?;
    write_u64(writer, model.filter_entries() as u64)?;
    write_u64(writer, model.filter_hashes() as u64)?;
    writer.write_all(&[model.bleach()])?;

    for &slot in model.input_order().as_slice() {
        write_u64(writer, slot as u64)?;
    }

    // Hash-parameter matrix: stride, then flat data.
    write_u64(writer, model.filter_inputs() as u64)?;
    for &param in model.hash_parameters().as_slice() {
        write_u64(writer, param)?;
    }

    // Counter tensor: two strides, then flat data.
    write_u64(writer, (model.num_filters() * model.filter_entries()) as u64)?;
    write_u64(writer, model.filter_entries() as u64)?;
    for &counter in model.counters().as_slice() {
        write_u64(writer, counter)?;
    }

    Ok(())
}

/// Saves a model to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_model<P: AsRef<Path>>(model: &WisardClassifier, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_model(model, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Deserializes a model from a reader.
///
/// # Errors
///
/// Returns an `Io` error on truncated data and a `FormatError` on
/// inconsistent configuration, strides, ordering, or hash parameters.
pub fn read_model<R: Read>(reader: &mut R) -> Result<WisardClassifier> {
    let pad_zeros = read_usize_field(reader, "pad_zeros")?;
    let num_inputs_total = read_usize_field(reader, "num_inputs_total")?;
    let bits_per_input = read_usize_field(reader, "bits_per_input")?;
    let num_classes = read_usize_field(reader, "num_classes")?;
    let filter_inputs = read_usize_field(reader, "filter_inputs")?;
    let filter_entries = read_usize_field(reader, "filter_entries")?;
    let filter_hashes = read_usize_field(reader, "filter_hashes")?;

    let mut bleach_buf = [0u8; 1];
    reader.read_exact(&mut bleach_buf)?;
    let bleach = bleach_buf[0];

    if filter_inputs == 0 || num_inputs_total % filter_inputs != 0 {
        return Err(SabioError::FormatError {
            message: format!(
                "{num_inputs_total} total inputs do not divide into chunks of {filter_inputs}"
            ),
        });
    }
    let num_filters = num_inputs_total / filter_inputs;

    let param_count = checked_len(filter_hashes, filter_inputs, 1)?;
    let counter_count = checked_len(num_classes, num_filters, filter_entries)?;

    let order: Vec<usize> = read_u64_vec(reader, num_inputs_total)?
        .into_iter()
        .map(|v| v as usize)
        .collect();
    let input_order = InputPermutation::from_order(order)?;

    let hash_stride = read_u64(reader)?;
    if hash_stride != filter_inputs as u64 {
        return Err(SabioError::FormatError {
            message: format!("hash matrix stride {hash_stride}, expected {filter_inputs}"),
        });
    }
    let hash_parameters =
        Matrix::from_vec(filter_hashes, filter_inputs, read_u64_vec(reader, param_count)?)?;

    let stride1 = read_u64(reader)?;
    let stride2 = read_u64(reader)?;
    if stride1 != (num_filters * filter_entries) as u64 || stride2 != filter_entries as u64 {
        return Err(SabioError::FormatError {
            message: format!(
                "counter tensor strides ({stride1}, {stride2}) inconsistent with \
                 {num_filters} filters of {filter_entries} entries"
            ),
        });
    }
    let data = Tensor3::from_vec(
        num_classes,
        num_filters,
        filter_entries,
        read_u64_vec(reader, counter_count)?,
    )?;

    WisardClassifier::from_parts(pad_zeros, bits_per_input, bleach, input_order, hash_parameters, data)
}

/// Loads a model from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is truncated, or is
/// inconsistent. Open failures surface as `Io`, never a silent default.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<WisardClassifier> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_model(&mut reader)
}

fn read_usize_field<R: Read>(reader: &mut R, name: &str) -> Result<usize> {
    let value = read_u64(reader)?;
    usize::try_from(value).map_err(|_| SabioError::FormatError {
        message: format!("{name} = {value} does not fit in usize"),
    })
}

/// Buffer length from file-provided dimensions, rejecting overflowing sizes.
fn checked_len(a: usize, b: usize, c: usize) -> Result<usize> {
    a.checked_mul(b)
        .and_then(|ab| ab.checked_mul(c))
        .ok_or_else(|| SabioError::FormatError {
            message: format!("buffer size {a} * {b} * {c} overflows"),
        })
}
