//! Existence probes consulted for function and constant fallback.

use std::sync::Arc;

use rustc_hash::FxHashSet;

/// Answers whether a namespaced function or constant exists.
///
/// Names are given in runtime form: fully qualified, without the leading
/// separator (`Vendor\helper`).
pub trait SymbolProbe {
    fn function_exists(&self, name: &str) -> bool;
    fn constant_exists(&self, name: &str) -> bool;
}

impl<T: SymbolProbe + ?Sized> SymbolProbe for &T {
    fn function_exists(&self, name: &str) -> bool {
        (**self).function_exists(name)
    }

    fn constant_exists(&self, name: &str) -> bool {
        (**self).constant_exists(name)
    }
}

impl<T: SymbolProbe + ?Sized> SymbolProbe for Arc<T> {
    fn function_exists(&self, name: &str) -> bool {
        (**self).function_exists(name)
    }

    fn constant_exists(&self, name: &str) -> bool {
        (**self).constant_exists(name)
    }
}

/// Knows no symbols: every unqualified function or constant falls back to
/// the global namespace.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSymbols;

impl SymbolProbe for NoSymbols {
    fn function_exists(&self, _name: &str) -> bool {
        false
    }

    fn constant_exists(&self, _name: &str) -> bool {
        false
    }
}

/// A fixed set of known functions and constants.
///
/// Function names compare case-insensitively, constants exactly.
#[derive(Clone, Debug, Default)]
pub struct KnownSymbols {
    functions: FxHashSet<String>,
    constants: FxHashSet<String>,
}

impl KnownSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function(mut self, name: &str) -> Self {
        self.add_function(name);
        self
    }

    pub fn with_constant(mut self, name: &str) -> Self {
        self.add_constant(name);
        self
    }

    pub fn add_function(&mut self, name: &str) {
        self.functions.insert(runtime_form(name).to_lowercase());
    }

    pub fn add_constant(&mut self, name: &str) {
        self.constants.insert(runtime_form(name).to_owned());
    }
}

impl SymbolProbe for KnownSymbols {
    fn function_exists(&self, name: &str) -> bool {
        self.functions.contains(&runtime_form(name).to_lowercase())
    }

    fn constant_exists(&self, name: &str) -> bool {
        self.constants.contains(runtime_form(name))
    }
}

fn runtime_form(name: &str) -> &str {
    name.strip_prefix('\\').unwrap_or(name)
}

/// Probe backed by two closures, for embedding a host's own lookups.
#[derive(Clone)]
pub struct FnProbe<F, C> {
    functions: F,
    constants: C,
}

impl<F, C> FnProbe<F, C>
where
    F: Fn(&str) -> bool,
    C: Fn(&str) -> bool,
{
    pub fn new(functions: F, constants: C) -> Self {
        Self { functions, constants }
    }
}

impl<F, C> SymbolProbe for FnProbe<F, C>
where
    F: Fn(&str) -> bool,
    C: Fn(&str) -> bool,
{
    fn function_exists(&self, name: &str) -> bool {
        (self.functions)(name)
    }

    fn constant_exists(&self, name: &str) -> bool {
        (self.constants)(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols_case_rules() {
        let probe = KnownSymbols::new()
            .with_function("Vendor\\Helper")
            .with_constant("\\Vendor\\LIMIT");

        assert!(probe.function_exists("vendor\\helper"));
        assert!(probe.function_exists("\\Vendor\\HELPER"));
        assert!(probe.constant_exists("Vendor\\LIMIT"));
        assert!(!probe.constant_exists("Vendor\\limit"));
    }

    #[test]
    fn test_fn_probe_delegates() {
        let probe = FnProbe::new(|name: &str| name == "A\\f", |_: &str| true);

        assert!(probe.function_exists("A\\f"));
        assert!(!probe.function_exists("A\\g"));
        assert!(probe.constant_exists("anything"));
        assert!(!NoSymbols.constant_exists("anything"));
    }
}
