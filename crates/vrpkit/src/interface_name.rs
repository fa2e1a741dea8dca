//! Interface naming - type classification and canonical names
//!
//! Device output and task files spell interfaces differently
//! (`GE0/0/1`, `GigabitEthernet0/0/1`, `ge 0/0/1`). Classification drives
//! the gigabit-only speed/duplex rules; normalization lets both sides be
//! brought to one spelling before matching.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `<type><number>` with optional whitespace in between
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d*[A-Za-z][A-Za-z\-]*?)\s*(\d[\d/.:]*)\s*$").unwrap()
});

/// Interface families known to VRP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    GigabitEthernet,
    XGigabitEthernet,
    TwentyFiveGe,
    FortyGe,
    HundredGe,
    Vlanif,
    LoopBack,
    EthTrunk,
    Nve,
}

/// Lower-case prefixes, longest spellings first so `xge` never reads as `ge`
const PREFIXES: &[(&str, InterfaceType)] = &[
    ("xgigabitethernet", InterfaceType::XGigabitEthernet),
    ("gigabitethernet", InterfaceType::GigabitEthernet),
    ("eth-trunk", InterfaceType::EthTrunk),
    ("loopback", InterfaceType::LoopBack),
    ("vlanif", InterfaceType::Vlanif),
    ("100ge", InterfaceType::HundredGe),
    ("40ge", InterfaceType::FortyGe),
    ("25ge", InterfaceType::TwentyFiveGe),
    ("xge", InterfaceType::XGigabitEthernet),
    ("nve", InterfaceType::Nve),
    ("ge", InterfaceType::GigabitEthernet),
];

impl InterfaceType {
    /// Classify an interface name by its prefix
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        PREFIXES
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix))
            .map(|(_, ty)| *ty)
    }

    /// Canonical VRP spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GigabitEthernet => "GigabitEthernet",
            Self::XGigabitEthernet => "XGigabitEthernet",
            Self::TwentyFiveGe => "25GE",
            Self::FortyGe => "40GE",
            Self::HundredGe => "100GE",
            Self::Vlanif => "Vlanif",
            Self::LoopBack => "LoopBack",
            Self::EthTrunk => "Eth-Trunk",
            Self::Nve => "Nve",
        }
    }

    /// Whether speed, duplex and negotiation apply to this family
    pub fn is_gigabit(self) -> bool {
        self == Self::GigabitEthernet
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `name` is a gigabit-class interface
pub fn is_gigabit(name: &str) -> bool {
    InterfaceType::from_name(name).is_some_and(InterfaceType::is_gigabit)
}

/// Canonical spelling of `name`, or `name` unchanged when it is not
/// recognised
pub fn normalize(name: &str) -> String {
    let Some(ty) = InterfaceType::from_name(name) else {
        return name.to_string();
    };
    let number = NAME_RE.captures(name).and_then(|caps| caps.get(2));

    match number {
        Some(number) => format!("{ty}{}", number.as_str()),
        None => name.to_string(),
    }
}
