use std::{
    collections::HashMap,
    env::VarError,
    ffi::{OsStr, OsString},
};

/// Source of environment variables for the resolver.
///
/// Every environment read made by this crate goes through [`EnvContext::get_env`], so callers can
/// point the resolver at a fake cluster without touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvContext {
    /// Environment variables that override the process environment ([`mod@std::env`]).
    env_override: HashMap<OsString, OsString>,

    /// If true, use only [`Self::env_override`] strictly without [`mod@std::env`].
    strict_env: bool,
}

impl EnvContext {
    /// Adds an override for an environment variable.
    ///
    /// This override will only affect [`Self::get_env`] behavior,
    /// it will **not** change the process environment.
    pub fn override_env<K: AsRef<OsStr>, V: AsRef<OsStr>>(mut self, key: K, value: V) -> Self {
        self.env_override
            .insert(key.as_ref().into(), value.as_ref().into());
        self
    }

    /// Adds overrides for multiple environment variables.
    pub fn override_envs<K: AsRef<OsStr>, V: AsRef<OsStr>, I: IntoIterator<Item = (K, V)>>(
        mut self,
        envs: I,
    ) -> Self {
        for (key, value) in envs {
            self.env_override
                .insert(key.as_ref().into(), value.as_ref().into());
        }
        self
    }

    /// Disables usage of [`mod@std::env`] in [`Self::get_env`].
    pub fn strict_env(mut self, value: bool) -> Self {
        self.strict_env = value;
        self
    }

    /// Returns value of an environment variable with the given name.
    ///
    /// Nothing is cached: the process environment is consulted again on every call.
    pub fn get_env(&self, name: &str) -> Result<String, VarError> {
        let os_value = match self.env_override.get(OsStr::new(name)) {
            Some(value) => Ok(value.clone()),
            None if self.strict_env => Err(VarError::NotPresent),
            None => std::env::var_os(name).ok_or(VarError::NotPresent),
        }?;

        os_value.into_string().map_err(VarError::NotUnicode)
    }

    /// Like [`Self::get_env`], but treats a missing, empty or non-unicode variable as [`None`].
    pub fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get_env(name).ok().filter(|value| !value.is_empty())
    }
}
