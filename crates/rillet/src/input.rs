//! Parsing comma separated values from the command line into arrays.

use std::error::Error;
use std::str::FromStr;

use rillet_core::arrays::array::{Array, ArrayData};
use rillet_core::arrays::datatype::{DataType, ElementType};
use rillet_error::{Result, ResultExt};

/// Parse comma separated values, with "null" (any case) meaning NULL.
///
/// An empty (or all whitespace) input produces no values.
pub fn parse_values<T>(input: &str) -> Result<Vec<Option<T>>>
where
    T: ElementType + FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(|item| {
            let item = item.trim();
            if item.eq_ignore_ascii_case("null") {
                return Ok(None);
            }
            item.parse::<T>()
                .map(Some)
                .context_fn(|| format!("Failed to parse '{item}' as {}", T::DATATYPE))
        })
        .collect()
}

/// Parse values and split them into `num_partitions` contiguous arrays.
///
/// Always produces at least one array, fewer than `num_partitions` if there
/// aren't enough values.
pub fn parse_partitioned(
    datatype: DataType,
    input: &str,
    num_partitions: usize,
) -> Result<Vec<ArrayData>> {
    match datatype {
        DataType::Boolean => partitioned::<bool>(input, num_partitions),
        DataType::Int8 => partitioned::<i8>(input, num_partitions),
        DataType::Int16 => partitioned::<i16>(input, num_partitions),
        DataType::Int32 => partitioned::<i32>(input, num_partitions),
        DataType::Int64 => partitioned::<i64>(input, num_partitions),
        DataType::UInt8 => partitioned::<u8>(input, num_partitions),
        DataType::UInt16 => partitioned::<u16>(input, num_partitions),
        DataType::UInt32 => partitioned::<u32>(input, num_partitions),
        DataType::UInt64 => partitioned::<u64>(input, num_partitions),
        DataType::Float32 => partitioned::<f32>(input, num_partitions),
        DataType::Float64 => partitioned::<f64>(input, num_partitions),
        DataType::Utf8 => partitioned::<String>(input, num_partitions),
    }
}

fn partitioned<T>(input: &str, num_partitions: usize) -> Result<Vec<ArrayData>>
where
    T: ElementType + FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    let values = parse_values::<T>(input)?;
    if values.is_empty() {
        return Ok(vec![Array::<T>::empty().into()]);
    }

    let chunk_size = values.len().div_ceil(num_partitions.max(1));
    Ok(values
        .chunks(chunk_size)
        .map(|chunk| Array::from_iter(chunk.iter().cloned()).into())
        .collect())
}

/// Parse a `name=value` pair.
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected 'name=value', got '{s}'"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

/// Format an array as `[a, b, NULL]`.
pub fn format_array(array: &ArrayData) -> String {
    let values: Vec<_> = (0..array.len()).map(|idx| array.format_value(idx)).collect();
    format!("[{}]", values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_nulls() {
        let values = parse_values::<i64>("1, NULL,3,null").unwrap();
        assert_eq!(vec![Some(1), None, Some(3), None], values);
    }

    #[test]
    fn parse_empty() {
        assert!(parse_values::<f64>("  ").unwrap().is_empty());
    }

    #[test]
    fn parse_invalid() {
        let err = parse_values::<i64>("1,two").unwrap_err();
        assert!(err.to_string().contains("'two'"), "{err}");
    }

    #[test]
    fn partition_chunks() {
        let arrays = parse_partitioned(DataType::Int64, "1,2,3,4,5", 2).unwrap();
        assert_eq!(2, arrays.len());
        assert_eq!("[1, 2, 3]", format_array(&arrays[0]));
        assert_eq!("[4, 5]", format_array(&arrays[1]));
    }

    #[test]
    fn partition_more_than_values() {
        let arrays = parse_partitioned(DataType::Boolean, "true,false", 5).unwrap();
        assert_eq!(2, arrays.len());

        let arrays = parse_partitioned(DataType::Utf8, "", 5).unwrap();
        assert_eq!(1, arrays.len());
        assert!(arrays[0].is_empty());
    }

    #[test]
    fn key_val() {
        assert_eq!(
            ("a".to_string(), "b=c".to_string()),
            parse_key_val("a = b=c").unwrap()
        );
        parse_key_val("nope").unwrap_err();
    }
}
