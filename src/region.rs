//! Static country tables: country → region and country → ISO flag code.
//!
//! The table is built once per process and handed out by reference; nothing
//! mutates it afterwards.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::RaceError;

/// Closed set of regions a country can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Asia,
    Europe,
    Africa,
    Americas,
    Oceania,
    Unknown,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Asia,
        Region::Europe,
        Region::Africa,
        Region::Americas,
        Region::Oceania,
        Region::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Oceania => "Oceania",
            Region::Unknown => "Unknown",
        }
    }

    /// Bar colour used by the chart legend.
    pub fn color(&self) -> &'static str {
        match self {
            Region::Asia => "#6047ec",
            Region::Europe => "#a66de8",
            Region::Africa => "#da8089",
            Region::Americas => "#fecd45",
            Region::Oceania => "#f6a431",
            Region::Unknown => "#9ca3af",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RaceError::InvalidData(format!("Unknown region: '{s}'")))
    }
}

#[derive(Debug, Clone, Copy)]
struct CountryInfo {
    region: Region,
    flag_code: &'static str,
}

/// Immutable lookup from canonical country name to region and flag code.
///
/// Lookups are exact and case-sensitive.
#[derive(Debug)]
pub struct CountryTable {
    entries: HashMap<&'static str, CountryInfo>,
}

impl CountryTable {
    /// The built-in table of 195 sovereign states.
    pub fn builtin() -> &'static CountryTable {
        static TABLE: OnceLock<CountryTable> = OnceLock::new();
        TABLE.get_or_init(|| Self::from_entries(COUNTRIES))
    }

    /// Build a table from `(country, region, flag_code)` triples.
    pub fn from_entries(entries: &[(&'static str, Region, &'static str)]) -> Self {
        let entries = entries
            .iter()
            .map(|&(name, region, flag_code)| (name, CountryInfo { region, flag_code }))
            .collect();
        Self { entries }
    }

    pub fn region(&self, country: &str) -> Option<Region> {
        self.entries.get(country).map(|info| info.region)
    }

    /// Lowercase ISO 3166-1 alpha-2 code, as used by flag icon sets.
    pub fn flag_code(&self, country: &str) -> Option<&'static str> {
        self.entries.get(country).map(|info| info.flag_code)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.entries.contains_key(country)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use Region::{Africa, Americas, Asia, Europe, Oceania};

#[rustfmt::skip]
const COUNTRIES: &[(&str, Region, &str)] = &[
    ("Afghanistan", Asia, "af"),
    ("Albania", Europe, "al"),
    ("Algeria", Africa, "dz"),
    ("Andorra", Europe, "ad"),
    ("Angola", Africa, "ao"),
    ("Antigua and Barbuda", Americas, "ag"),
    ("Argentina", Americas, "ar"),
    ("Armenia", Asia, "am"),
    ("Australia", Oceania, "au"),
    ("Austria", Europe, "at"),
    ("Azerbaijan", Asia, "az"),
    ("Bahamas", Americas, "bs"),
    ("Bahrain", Asia, "bh"),
    ("Bangladesh", Asia, "bd"),
    ("Barbados", Americas, "bb"),
    ("Belarus", Europe, "by"),
    ("Belgium", Europe, "be"),
    ("Belize", Americas, "bz"),
    ("Benin", Africa, "bj"),
    ("Bhutan", Asia, "bt"),
    ("Bolivia", Americas, "bo"),
    ("Bosnia and Herzegovina", Europe, "ba"),
    ("Botswana", Africa, "bw"),
    ("Brazil", Americas, "br"),
    ("Brunei", Asia, "bn"),
    ("Bulgaria", Europe, "bg"),
    ("Burkina Faso", Africa, "bf"),
    ("Burundi", Africa, "bi"),
    ("Cabo Verde", Africa, "cv"),
    ("Cambodia", Asia, "kh"),
    ("Cameroon", Africa, "cm"),
    ("Canada", Americas, "ca"),
    ("Central African Republic", Africa, "cf"),
    ("Chad", Africa, "td"),
    ("Chile", Americas, "cl"),
    ("China", Asia, "cn"),
    ("Colombia", Americas, "co"),
    ("Comoros", Africa, "km"),
    ("Congo", Africa, "cg"),
    ("Costa Rica", Americas, "cr"),
    ("Croatia", Europe, "hr"),
    ("Cuba", Americas, "cu"),
    ("Cyprus", Asia, "cy"),
    ("Czechia", Europe, "cz"),
    ("Democratic Republic of the Congo", Africa, "cd"),
    ("Denmark", Europe, "dk"),
    ("Djibouti", Africa, "dj"),
    ("Dominica", Americas, "dm"),
    ("Dominican Republic", Americas, "do"),
    ("Ecuador", Americas, "ec"),
    ("Egypt", Africa, "eg"),
    ("El Salvador", Americas, "sv"),
    ("Equatorial Guinea", Africa, "gq"),
    ("Eritrea", Africa, "er"),
    ("Estonia", Europe, "ee"),
    ("Eswatini", Africa, "sz"),
    ("Ethiopia", Africa, "et"),
    ("Fiji", Oceania, "fj"),
    ("Finland", Europe, "fi"),
    ("France", Europe, "fr"),
    ("Gabon", Africa, "ga"),
    ("Gambia", Africa, "gm"),
    ("Georgia", Asia, "ge"),
    ("Germany", Europe, "de"),
    ("Ghana", Africa, "gh"),
    ("Greece", Europe, "gr"),
    ("Grenada", Americas, "gd"),
    ("Guatemala", Americas, "gt"),
    ("Guinea", Africa, "gn"),
    ("Guinea-Bissau", Africa, "gw"),
    ("Guyana", Americas, "gy"),
    ("Haiti", Americas, "ht"),
    ("Honduras", Americas, "hn"),
    ("Hungary", Europe, "hu"),
    ("Iceland", Europe, "is"),
    ("India", Asia, "in"),
    ("Indonesia", Asia, "id"),
    ("Iran", Asia, "ir"),
    ("Iraq", Asia, "iq"),
    ("Ireland", Europe, "ie"),
    ("Israel", Asia, "il"),
    ("Italy", Europe, "it"),
    ("Jamaica", Americas, "jm"),
    ("Japan", Asia, "jp"),
    ("Jordan", Asia, "jo"),
    ("Kazakhstan", Asia, "kz"),
    ("Kenya", Africa, "ke"),
    ("Kiribati", Oceania, "ki"),
    ("Kuwait", Asia, "kw"),
    ("Kyrgyzstan", Asia, "kg"),
    ("Laos", Asia, "la"),
    ("Latvia", Europe, "lv"),
    ("Lebanon", Asia, "lb"),
    ("Lesotho", Africa, "ls"),
    ("Liberia", Africa, "lr"),
    ("Libya", Africa, "ly"),
    ("Liechtenstein", Europe, "li"),
    ("Lithuania", Europe, "lt"),
    ("Luxembourg", Europe, "lu"),
    ("Madagascar", Africa, "mg"),
    ("Malawi", Africa, "mw"),
    ("Malaysia", Asia, "my"),
    ("Maldives", Asia, "mv"),
    ("Mali", Africa, "ml"),
    ("Malta", Europe, "mt"),
    ("Marshall Islands", Oceania, "mh"),
    ("Mauritania", Africa, "mr"),
    ("Mauritius", Africa, "mu"),
    ("Mexico", Americas, "mx"),
    ("Micronesia", Oceania, "fm"),
    ("Moldova", Europe, "md"),
    ("Monaco", Europe, "mc"),
    ("Mongolia", Asia, "mn"),
    ("Montenegro", Europe, "me"),
    ("Morocco", Africa, "ma"),
    ("Mozambique", Africa, "mz"),
    ("Myanmar", Asia, "mm"),
    ("Namibia", Africa, "na"),
    ("Nauru", Oceania, "nr"),
    ("Nepal", Asia, "np"),
    ("Netherlands", Europe, "nl"),
    ("New Zealand", Oceania, "nz"),
    ("Nicaragua", Americas, "ni"),
    ("Niger", Africa, "ne"),
    ("Nigeria", Africa, "ng"),
    ("North Korea", Asia, "kp"),
    ("North Macedonia", Europe, "mk"),
    ("Norway", Europe, "no"),
    ("Oman", Asia, "om"),
    ("Pakistan", Asia, "pk"),
    ("Palau", Oceania, "pw"),
    ("Palestine", Asia, "ps"),
    ("Panama", Americas, "pa"),
    ("Papua New Guinea", Oceania, "pg"),
    ("Paraguay", Americas, "py"),
    ("Peru", Americas, "pe"),
    ("Philippines", Asia, "ph"),
    ("Poland", Europe, "pl"),
    ("Portugal", Europe, "pt"),
    ("Qatar", Asia, "qa"),
    ("Romania", Europe, "ro"),
    ("Russia", Europe, "ru"),
    ("Rwanda", Africa, "rw"),
    ("Saint Kitts and Nevis", Americas, "kn"),
    ("Saint Lucia", Americas, "lc"),
    ("Saint Vincent and the Grenadines", Americas, "vc"),
    ("Samoa", Oceania, "ws"),
    ("San Marino", Europe, "sm"),
    ("Sao Tome and Principe", Africa, "st"),
    ("Saudi Arabia", Asia, "sa"),
    ("Senegal", Africa, "sn"),
    ("Serbia", Europe, "rs"),
    ("Seychelles", Africa, "sc"),
    ("Sierra Leone", Africa, "sl"),
    ("Singapore", Asia, "sg"),
    ("Slovakia", Europe, "sk"),
    ("Slovenia", Europe, "si"),
    ("Solomon Islands", Oceania, "sb"),
    ("Somalia", Africa, "so"),
    ("South Africa", Africa, "za"),
    ("South Korea", Asia, "kr"),
    ("South Sudan", Africa, "ss"),
    ("Spain", Europe, "es"),
    ("Sri Lanka", Asia, "lk"),
    ("Sudan", Africa, "sd"),
    ("Suriname", Americas, "sr"),
    ("Sweden", Europe, "se"),
    ("Switzerland", Europe, "ch"),
    ("Syria", Asia, "sy"),
    ("Taiwan", Asia, "tw"),
    ("Tajikistan", Asia, "tj"),
    ("Tanzania", Africa, "tz"),
    ("Thailand", Asia, "th"),
    ("Timor-Leste", Asia, "tl"),
    ("Togo", Africa, "tg"),
    ("Tonga", Oceania, "to"),
    ("Trinidad and Tobago", Americas, "tt"),
    ("Tunisia", Africa, "tn"),
    ("Turkey", Asia, "tr"),
    ("Turkmenistan", Asia, "tm"),
    ("Tuvalu", Oceania, "tv"),
    ("Uganda", Africa, "ug"),
    ("Ukraine", Europe, "ua"),
    ("United Arab Emirates", Asia, "ae"),
    ("United Kingdom", Europe, "gb"),
    ("United States", Americas, "us"),
    ("Uruguay", Americas, "uy"),
    ("Uzbekistan", Asia, "uz"),
    ("Vanuatu", Oceania, "vu"),
    ("Vatican City", Europe, "va"),
    ("Venezuela", Americas, "ve"),
    ("Vietnam", Asia, "vn"),
    ("Yemen", Asia, "ye"),
    ("Zambia", Africa, "zm"),
    ("Zimbabwe", Africa, "zw"),
];
