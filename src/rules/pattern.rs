//! Format rules backed by precompiled regular expressions
//!
//! Every rule here applies to strings; any other input type fails. The
//! patterns are compiled once into process-wide statics.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::rule::Rule;

static ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());
static ALPHA_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());
static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]+$").unwrap());
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());
static HTML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"</?\w+((\s+\w+(\s*=\s*(?:".*?"|'.*?'|[^'">\s]+))?)+\s*|\s*)/?>"#).unwrap()
});
static MONGO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

fn regex_rule(name: &'static str, template: &'static str, regex: &'static LazyLock<Regex>) -> Rule {
    Rule::scalar(name, template, move |value, _| {
        value.as_str().is_some_and(|s| regex.is_match(s))
    })
}

/// ASCII letters only.
pub fn alpha() -> Rule {
    regex_rule("alpha", "{PATH} should only contain letters", &ALPHA)
}

/// An optionally negative decimal integer string.
pub fn numeric() -> Rule {
    regex_rule("numeric", "{PATH} should be numeric", &NUMERIC)
}

/// ASCII letters and digits only.
pub fn alpha_numeric() -> Rule {
    regex_rule(
        "alpha_numeric",
        "{PATH} should only contain letters and numbers",
        &ALPHA_NUMERIC,
    )
}

/// Hexadecimal digits only.
pub fn hex() -> Rule {
    regex_rule("hex", "{PATH} should be hexadecimal", &HEX)
}

/// A 3- or 6-digit hex color, `#` optional.
pub fn hex_color() -> Rule {
    regex_rule("hex_color", "{PATH} should be a hex color", &HEX_COLOR)
}

/// A non-empty, fully ASCII string.
pub fn ascii() -> Rule {
    Rule::scalar("ascii", "{PATH} should be ascii", |value, _| {
        value.as_str().is_some_and(|s| !s.is_empty() && s.is_ascii())
    })
}

/// Contains at least one HTML tag.
pub fn html() -> Rule {
    regex_rule("html", "{PATH} should contain html", &HTML)
}

/// A 24-character hexadecimal MongoDB object id.
pub fn mongo_id() -> Rule {
    regex_rule("mongo_id", "{PATH} should be a mongo id", &MONGO_ID)
}

/// An email address.
pub fn email() -> Rule {
    regex_rule("email", "{PATH} should be a valid email address", &EMAIL)
}

/// Which IP family [`ip`] should accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    /// Dotted-quad IPv4.
    V4,
    /// IPv6.
    V6,
}

/// An IP address, restricted to one family when `version` is given.
pub fn ip(version: Option<IpVersion>) -> Rule {
    let template = match version {
        Some(IpVersion::V4) => "{PATH} should be an ipv4 address",
        Some(IpVersion::V6) => "{PATH} should be an ipv6 address",
        None => "{PATH} should be an ip address",
    };
    let mut rule = Rule::scalar("ip", template, move |value, _| {
        let Some(s) = value.as_str() else {
            return false;
        };
        match version {
            Some(IpVersion::V4) => s.parse::<Ipv4Addr>().is_ok(),
            Some(IpVersion::V6) => s.parse::<Ipv6Addr>().is_ok(),
            None => s.parse::<Ipv4Addr>().is_ok() || s.parse::<Ipv6Addr>().is_ok(),
        }
    });
    if let Some(version) = version {
        let arg = match version {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        };
        rule = rule.with_args(vec![Value::from(arg)]);
    }
    rule
}

/// A phone number: 7 to 13 digits with common punctuation allowed.
pub fn phone_number() -> Rule {
    Rule::scalar("phone_number", "{PATH} should be a phone number", |value, _| {
        let Some(s) = value.as_str() else {
            return false;
        };
        let allowed = |c: char| c.is_ascii_digit() || "-.() +/".contains(c);
        if !s.chars().all(allowed) {
            return false;
        }
        let digits = s.chars().filter(char::is_ascii_digit).count();
        (7..=13).contains(&digits)
    })
}

/// Card networks [`credit_card`] can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    /// Visa: 13 or 16 digits starting with 4.
    Visa,
    /// Mastercard: 16 digits starting with 51-55.
    Mastercard,
    /// American Express: 15 digits starting with 34 or 37.
    AmericanExpress,
    /// Diners Club: 14 digits starting with 300-305, 36 or 38.
    DinersClub,
    /// Discover: 16 digits starting with 6011 or 65.
    Discover,
    /// JCB: 15 or 16 digits with the JCB prefixes.
    Jcb,
}

impl CardType {
    /// All supported networks.
    pub const ALL: [CardType; 6] = [
        CardType::Visa,
        CardType::Mastercard,
        CardType::AmericanExpress,
        CardType::DinersClub,
        CardType::Discover,
        CardType::Jcb,
    ];

    /// The registry name for this network.
    pub fn name(self) -> &'static str {
        match self {
            CardType::Visa => "visa",
            CardType::Mastercard => "mastercard",
            CardType::AmericanExpress => "americanexpress",
            CardType::DinersClub => "dinersclub",
            CardType::Discover => "discover",
            CardType::Jcb => "jcb",
        }
    }

    /// Parses a registry name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        CardType::ALL.into_iter().find(|card| card.name() == lower)
    }

    fn regex(self) -> &'static Regex {
        static VISA: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^4[0-9]{12}(?:[0-9]{3})?$").unwrap());
        static MASTERCARD: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^5[1-5][0-9]{14}$").unwrap());
        static AMEX: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^3[47][0-9]{13}$").unwrap());
        static DINERS: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^3(?:0[0-5]|[68][0-9])[0-9]{11}$").unwrap());
        static DISCOVER: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^6(?:011|5[0-9]{2})[0-9]{12}$").unwrap());
        static JCB: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^(?:2131|1800|35\d{3})\d{11}$").unwrap());

        match self {
            CardType::Visa => &VISA,
            CardType::Mastercard => &MASTERCARD,
            CardType::AmericanExpress => &AMEX,
            CardType::DinersClub => &DINERS,
            CardType::Discover => &DISCOVER,
            CardType::Jcb => &JCB,
        }
    }
}

/// A credit card number for one of the given networks.
///
/// An empty selection accepts any supported network. Dashes and spaces are
/// stripped before matching.
pub fn credit_card(types: Vec<CardType>) -> Rule {
    let accepted = if types.is_empty() { CardType::ALL.to_vec() } else { types };
    let args = accepted
        .iter()
        .map(|card| Value::from(card.name()))
        .collect();
    Rule::scalar("credit_card", "{PATH} should be a credit card number", move |value, _| {
        let Some(s) = value.as_str() else {
            return false;
        };
        let digits: String = s.chars().filter(|c| *c != '-' && *c != ' ').collect();
        accepted.iter().any(|card| card.regex().is_match(&digits))
    })
    .with_args(args)
}
