//! Symbols: sequences of name atoms, qualified or not.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::error::SymbolError;

/// The namespace separator.
pub const SEPARATOR: char = '\\';

/// Leading atom that makes a reference relative to the current namespace.
pub const NAMESPACE_ATOM: &str = "namespace";

/// A name made of one or more atoms.
///
/// A qualified symbol is absolute (rooted at the global namespace, rendered
/// with a leading `\`). An unqualified symbol is a reference that still has
/// to be resolved against a resolution context.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    atoms: Vec<SmolStr>,
    qualified: bool,
}

impl Symbol {
    /// Build a symbol from atoms, validating each one.
    pub fn from_atoms<I, S>(atoms: I, qualified: bool) -> Result<Self, SymbolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let atoms = atoms
            .into_iter()
            .map(|atom| validate_atom(atom.as_ref()).map(SmolStr::new))
            .collect::<Result<Vec<_>, _>>()?;
        if atoms.is_empty() {
            return Err(SymbolError::EmptySymbol);
        }
        Ok(Self { atoms, qualified })
    }

    /// Build a qualified symbol from a name in runtime form.
    ///
    /// Runtime class and function names never carry a leading separator
    /// but are always absolute.
    pub fn from_runtime_string(name: &str) -> Result<Self, SymbolError> {
        let name = name.strip_prefix(SEPARATOR).unwrap_or(name);
        Self::from_atoms(name.split(SEPARATOR), true)
    }

    /// Atoms that were already validated by the tokenizer.
    pub(crate) fn from_trusted_atoms(atoms: Vec<SmolStr>, qualified: bool) -> Self {
        debug_assert!(!atoms.is_empty());
        Self { atoms, qualified }
    }

    pub fn atoms(&self) -> &[SmolStr] {
        &self.atoms
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_qualified(&self) -> bool {
        self.qualified
    }

    pub fn first_atom(&self) -> &str {
        &self.atoms[0]
    }

    pub fn last_atom(&self) -> &str {
        &self.atoms[self.atoms.len() - 1]
    }

    /// The last atom as an unqualified single-atom symbol.
    pub fn name(&self) -> Symbol {
        Self::from_trusted_atoms(vec![self.atoms[self.atoms.len() - 1].clone()], false)
    }

    /// Same atoms, qualified.
    pub fn to_qualified(&self) -> Symbol {
        Self::from_trusted_atoms(self.atoms.clone(), true)
    }

    /// Same atoms, unqualified.
    pub fn to_reference(&self) -> Symbol {
        Self::from_trusted_atoms(self.atoms.clone(), false)
    }

    /// Append the atoms of `other`, keeping this symbol's qualification.
    pub fn join(&self, other: &Symbol) -> Symbol {
        self.join_atoms(&other.atoms)
    }

    pub fn join_atoms(&self, atoms: &[SmolStr]) -> Symbol {
        let mut joined = self.atoms.clone();
        joined.extend_from_slice(atoms);
        Self::from_trusted_atoms(joined, self.qualified)
    }

    /// `namespace ++ atoms` as a qualified symbol; the global namespace is
    /// `None`.
    pub(crate) fn qualify_in(namespace: Option<&Symbol>, atoms: &[SmolStr]) -> Symbol {
        match namespace {
            Some(namespace) => namespace.to_qualified().join_atoms(atoms),
            None => Self::from_trusted_atoms(atoms.to_vec(), true),
        }
    }

    /// A sub-range of the atoms. `None` when the range is empty or out of
    /// bounds. Only a slice starting at the first atom keeps qualification.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> Option<Symbol> {
        let end = match len {
            Some(len) => offset.checked_add(len)?,
            None => self.atoms.len(),
        };
        if offset >= end || end > self.atoms.len() {
            return None;
        }
        Some(Self::from_trusted_atoms(
            self.atoms[offset..end].to_vec(),
            self.qualified && offset == 0,
        ))
    }

    /// The enclosing namespace, `None` for single-atom symbols.
    pub fn parent(&self) -> Option<Symbol> {
        self.slice(0, Some(self.atoms.len() - 1))
    }

    /// True when `ancestor`'s atoms are a strict prefix of this symbol's.
    pub fn is_descendant_of(&self, ancestor: &Symbol) -> bool {
        ancestor.atoms.len() < self.atoms.len() && self.atoms.starts_with(&ancestor.atoms)
    }

    /// The atoms below `ancestor`, as an unqualified reference.
    pub fn relative_to(&self, ancestor: &Symbol) -> Option<Symbol> {
        if !self.is_descendant_of(ancestor) {
            return None;
        }
        Some(Self::from_trusted_atoms(
            self.atoms[ancestor.atoms.len()..].to_vec(),
            false,
        ))
    }

    /// Whether the first atom is the `namespace` keyword.
    pub fn starts_with_namespace_atom(&self) -> bool {
        self.atoms[0].eq_ignore_ascii_case(NAMESPACE_ATOM)
    }

    /// The name as the runtime reports it: no leading separator.
    pub fn runtime_string(&self) -> String {
        self.atoms.join("\\")
    }
}

fn validate_atom(atom: &str) -> Result<&str, SymbolError> {
    if atom.is_empty() {
        return Err(SymbolError::EmptyAtom);
    }
    if atom.contains(SEPARATOR) {
        return Err(SymbolError::SeparatorInAtom { atom: atom.to_owned() });
    }
    if !is_identifier(atom) {
        return Err(SymbolError::InvalidAtom { atom: atom.to_owned() });
    }
    Ok(atom)
}

/// PHP identifiers: a letter or underscore, then letters, digits or
/// underscores. Bytes above 0x7f are letters to PHP.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let start = first == '_' || !first.is_ascii() || unicode_ident::is_xid_start(first);
    start && chars.all(|c| c == '_' || !c.is_ascii() || unicode_ident::is_xid_continue(c))
}

impl FromStr for Symbol {
    type Err = SymbolError;

    /// `\A\B` parses qualified, `A\B` parses as a reference.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(SEPARATOR) {
            Some(rest) => Self::from_atoms(rest.split(SEPARATOR), true),
            None => Self::from_atoms(s.split(SEPARATOR), false),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualified {
            f.write_str("\\")?;
        }
        f.write_str(&self.atoms.join("\\"))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({self})")
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_string().cmp(&other.to_string())
    }
}
