use std::sync::{Mutex, OnceLock};
use string_interner::{DefaultSymbol, StringInterner};

type Sym = DefaultSymbol;

fn interner() -> &'static Mutex<StringInterner> {
    static INTERNER: OnceLock<Mutex<StringInterner>> = OnceLock::new();
    INTERNER.get_or_init(|| Mutex::new(StringInterner::new()))
}

/// An interned name, used for port and primitive names.
///
/// Cheap to copy and compare; the backing string lives in a process-global
/// interner for the lifetime of the program (mirrors the global-symbol-table
/// pattern used for identifiers elsewhere in this family of crates).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(Sym);

impl Id {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        let mut interner = interner().lock().unwrap();
        Id(interner.get_or_intern(name.as_ref()))
    }

    pub fn as_string(&self) -> String {
        let interner = interner().lock().unwrap();
        interner
            .resolve(self.0)
            .expect("interned symbol must resolve")
            .to_owned()
    }
}

impl std::fmt::Debug for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::new(s)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.as_string() == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.as_string() == *other
    }
}

/// Trait for IR nodes that carry a user-facing [`Id`].
pub trait GetName {
    fn name(&self) -> Id;
}
