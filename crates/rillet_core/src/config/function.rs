use std::collections::HashMap;
use std::sync::LazyLock;

use rillet_error::{DbError, Result, ResultExt};

/// Upper bound for `distinct_initial_capacity`.
pub const MAX_DISTINCT_INITIAL_CAPACITY: usize = 1 << 20;

/// Configuration for function execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    pub enable_primitive_distinct: bool,
    pub distinct_initial_capacity: usize,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        FunctionConfig {
            enable_primitive_distinct: true,
            distinct_initial_capacity: 0,
        }
    }
}

impl FunctionConfig {
    pub fn set_from_str(&mut self, name: &str, value: &str) -> Result<()> {
        let func = lookup_setting(name)?;
        (func.set)(value, self)
    }

    pub fn get_as_string(&self, name: &str) -> Result<String> {
        let func = lookup_setting(name)?;
        Ok((func.get)(self))
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        let func = lookup_setting(name)?;
        let def_conf = Self::default();
        (func.set)(&(func.get)(&def_conf), self)
    }

    /// Iterate over all setting names and their descriptions, sorted by name.
    pub fn settings() -> impl Iterator<Item = (&'static str, &'static str)> {
        let mut settings: Vec<_> = GET_SET_FUNCTIONS
            .iter()
            .map(|(name, funcs)| (*name, funcs.description))
            .collect();
        settings.sort_unstable();
        settings.into_iter()
    }
}

fn lookup_setting(name: &str) -> Result<&'static SettingFunctions> {
    GET_SET_FUNCTIONS
        .get(name)
        .ok_or_else(|| DbError::new(format!("Missing setting for '{name}'")))
}

struct SettingFunctions {
    description: &'static str,
    set: fn(value: &str, conf: &mut FunctionConfig) -> Result<()>,
    get: fn(conf: &FunctionConfig) -> String,
}

impl SettingFunctions {
    const fn new<S: FunctionSetting>() -> Self {
        SettingFunctions {
            description: S::DESCRIPTION,
            set: S::set_from_str as _,
            get: S::get_as_string as _,
        }
    }
}

fn insert_setting<S: FunctionSetting>(map: &mut HashMap<&'static str, SettingFunctions>) {
    if map.insert(S::NAME, SettingFunctions::new::<S>()).is_some() {
        panic!("Duplicate settings names: {}", S::NAME);
    }
}

static GET_SET_FUNCTIONS: LazyLock<HashMap<&'static str, SettingFunctions>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    insert_setting::<EnablePrimitiveDistinct>(&mut map);
    insert_setting::<DistinctInitialCapacity>(&mut map);

    map
});

pub trait FunctionSetting: Sync + Send + 'static {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn set_from_str(value: &str, conf: &mut FunctionConfig) -> Result<()>;
    fn get_as_string(conf: &FunctionConfig) -> String;
}

pub struct EnablePrimitiveDistinct;

impl FunctionSetting for EnablePrimitiveDistinct {
    const NAME: &'static str = "enable_primitive_distinct";
    const DESCRIPTION: &'static str =
        "Use bit fingerprints instead of the element comparer when deduplicating integer arrays";

    fn set_from_str(value: &str, conf: &mut FunctionConfig) -> Result<()> {
        conf.enable_primitive_distinct = value
            .trim()
            .parse::<bool>()
            .context("Expected 'true' or 'false' for enable_primitive_distinct")?;
        Ok(())
    }

    fn get_as_string(conf: &FunctionConfig) -> String {
        conf.enable_primitive_distinct.to_string()
    }
}

pub struct DistinctInitialCapacity;

impl FunctionSetting for DistinctInitialCapacity {
    const NAME: &'static str = "distinct_initial_capacity";
    const DESCRIPTION: &'static str = "Minimum number of elements to reserve in distinct sets";

    fn set_from_str(value: &str, conf: &mut FunctionConfig) -> Result<()> {
        let capacity = value
            .trim()
            .parse::<usize>()
            .context("Expected an unsigned integer for distinct_initial_capacity")?;
        if capacity > MAX_DISTINCT_INITIAL_CAPACITY {
            return Err(DbError::new("distinct_initial_capacity too large")
                .with_field("value", capacity)
                .with_field("max", MAX_DISTINCT_INITIAL_CAPACITY));
        }
        conf.distinct_initial_capacity = capacity;
        Ok(())
    }

    fn get_as_string(conf: &FunctionConfig) -> String {
        conf.distinct_initial_capacity.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut conf = FunctionConfig::default();
        conf.set_from_str("enable_primitive_distinct", "false").unwrap();
        conf.set_from_str("distinct_initial_capacity", " 64 ").unwrap();

        assert!(!conf.enable_primitive_distinct);
        assert_eq!(64, conf.distinct_initial_capacity);
        assert_eq!("false", conf.get_as_string("enable_primitive_distinct").unwrap());
        assert_eq!("64", conf.get_as_string("distinct_initial_capacity").unwrap());
    }

    #[test]
    fn reset_to_default() {
        let mut conf = FunctionConfig::default();
        conf.set_from_str("distinct_initial_capacity", "16").unwrap();
        conf.reset("distinct_initial_capacity").unwrap();

        assert_eq!(FunctionConfig::default(), conf);
    }

    #[test]
    fn unknown_setting() {
        let mut conf = FunctionConfig::default();
        conf.set_from_str("does_not_exist", "1").unwrap_err();
        conf.get_as_string("does_not_exist").unwrap_err();
    }

    #[test]
    fn invalid_values() {
        let mut conf = FunctionConfig::default();
        conf.set_from_str("enable_primitive_distinct", "maybe")
            .unwrap_err();
        conf.set_from_str("distinct_initial_capacity", "-1")
            .unwrap_err();

        let err = conf
            .set_from_str("distinct_initial_capacity", "2000000")
            .unwrap_err();
        assert_eq!(Some("1048576"), err.get_field("max"));

        // Failed sets leave the config untouched.
        assert_eq!(FunctionConfig::default(), conf);
    }

    #[test]
    fn settings_listed() {
        let names: Vec<_> = FunctionConfig::settings().map(|(name, _)| name).collect();
        assert_eq!(
            vec!["distinct_initial_capacity", "enable_primitive_distinct"],
            names
        );
    }
}
