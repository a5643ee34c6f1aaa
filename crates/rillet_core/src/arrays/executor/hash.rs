use ahash::RandomState;

/// State used for all hashing operations.
pub const HASH_RANDOM_STATE: RandomState = RandomState::with_seeds(0, 0, 0, 0);

/// Helper trait for producing a hash fingerprint for a value.
///
/// Values that are not distinct from each other must produce the same hash.
/// For floats this means hashing a canonical bit pattern: every NaN hashes the
/// same, and -0.0 hashes the same as 0.0.
pub trait HashValue {
    fn hash_one(&self) -> u64;
}

macro_rules! impl_hash_value {
    ($typ:ty) => {
        impl HashValue for $typ {
            fn hash_one(&self) -> u64 {
                HASH_RANDOM_STATE.hash_one(self)
            }
        }
    };
}

impl_hash_value!(bool);
impl_hash_value!(i8);
impl_hash_value!(i16);
impl_hash_value!(i32);
impl_hash_value!(i64);
impl_hash_value!(u8);
impl_hash_value!(u16);
impl_hash_value!(u32);
impl_hash_value!(u64);
impl_hash_value!(str);
impl_hash_value!(String);

impl HashValue for f32 {
    fn hash_one(&self) -> u64 {
        let canonical = if self.is_nan() {
            f32::NAN
        } else if *self == 0.0 {
            0.0
        } else {
            *self
        };
        HASH_RANDOM_STATE.hash_one(canonical.to_bits())
    }
}

impl HashValue for f64 {
    fn hash_one(&self) -> u64 {
        let canonical = if self.is_nan() {
            f64::NAN
        } else if *self == 0.0 {
            0.0
        } else {
            *self
        };
        HASH_RANDOM_STATE.hash_one(canonical.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_zero_and_nan_canonical() {
        assert_eq!(0.0_f64.hash_one(), (-0.0_f64).hash_one());
        assert_eq!(f64::NAN.hash_one(), (-f64::NAN).hash_one());
        assert_eq!(0.0_f32.hash_one(), (-0.0_f32).hash_one());
        assert_ne!(1.0_f64.hash_one(), 2.0_f64.hash_one());
    }

    #[test]
    fn str_and_string_match() {
        assert_eq!("hello".hash_one(), "hello".to_string().hash_one());
    }
}
