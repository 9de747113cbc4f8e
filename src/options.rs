//! Declared options and the values bound to them.
//!
//! An `OptionSet` lists the options and positional slots a program accepts.
//! Binding an argument vector against it runs the tokenizer with the set as
//! its `ParseCallbacks` and collects everything into `Values`.

use std::sync::Arc;

use log::debug;

use crate::{
    errors::{ParseErrorKind, ParseFailure},
    naming::{self, NamingPolicy},
    parse::{
        tokenize, OptionValueKind, OptionValueMatch, ParseCallbacks, PositionalValueMatch,
        TokenizerOptions,
    },
    style::{OptionPrefix, StyleProfile},
    synonym::SynonymMap,
    value::parse_bool,
};

/// A bound value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Switch(bool),
    Plain(Option<String>),
    List(Vec<String>),
    Dict(Vec<(String, String)>),
}

impl Value {
    /// The value of a switch. A plain value is read as a boolean literal.
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Switch(b) => b,
            Value::Plain(Some(ref s)) => parse_bool(s).unwrap_or(false),
            Value::Plain(None) => false,
            Value::List(ref vs) => !vs.is_empty(),
            Value::Dict(ref kvs) => !kvs.is_empty(),
        }
    }

    /// The value of a plain option or single positional. The empty string
    /// if absent.
    pub fn as_str(&self) -> &str {
        match *self {
            Value::Plain(Some(ref s)) => s,
            Value::List(ref vs) if vs.len() == 1 => &vs[0],
            _ => "",
        }
    }

    /// The items of a list option or variadic positional.
    pub fn as_vec(&self) -> Vec<&str> {
        match *self {
            Value::List(ref vs) => vs.iter().map(|s| &**s).collect(),
            Value::Plain(Some(ref s)) => vec![s.as_str()],
            _ => vec![],
        }
    }

    /// The entries of a dictionary option, in first-seen key order.
    pub fn as_dict(&self) -> Vec<(&str, &str)> {
        match *self {
            Value::Dict(ref kvs) => kvs.iter().map(|(k, v)| (&**k, &**v)).collect(),
            _ => vec![],
        }
    }

    fn default_for(kind: OptionValueKind) -> Value {
        match kind {
            OptionValueKind::Boolean => Value::Switch(false),
            OptionValueKind::Normal => Value::Plain(None),
            OptionValueKind::List => Value::List(vec![]),
            OptionValueKind::Dictionary => Value::Dict(vec![]),
        }
    }
}

/// The values of one successful bind, keyed by declared name.
///
/// Every declared option and positional has an entry, holding its default
/// if it was not given. Options can also be looked up by their short names
/// and by the kebab-case form of their declared name.
#[derive(Clone, Debug, Default)]
pub struct Values {
    map:   SynonymMap<String, Value>,
    /// Declared names, options first, in declaration order.
    order: Vec<String>,
}

impl Values {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.find(key)
    }

    /// `false` for unknown keys.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::as_bool)
    }

    /// `""` for unknown keys.
    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).map_or("", Value::as_str)
    }

    pub fn get_vec(&self, key: &str) -> Vec<&str> {
        self.get(key).map_or_else(Vec::new, Value::as_vec)
    }

    pub fn get_dict(&self, key: &str) -> Vec<(&str, &str)> {
        self.get(key).map_or_else(Vec::new, Value::as_dict)
    }

    /// Declared names and their values, options first, each in the order
    /// it was declared.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|k| self.map.find(k.as_str()).map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[derive(Clone, Debug)]
struct OptionDecl {
    property: Arc<str>,
    long:     Option<String>,
    shorts:   Vec<String>,
    kind:     OptionValueKind,
}

#[derive(Clone, Debug)]
struct PositionalDecl {
    property: Arc<str>,
    variadic: bool,
}

/// The options and positional slots a program (or one verb) accepts.
///
/// ```
/// use argvox::{OptionSet, StyleProfile, TokenizerOptions};
///
/// let set = OptionSet::new()
///     .flag("verbose", Some("v"))
///     .value("count", Some("c"))
///     .positional("input");
/// let vals = set
///     .bind(&["--count", "3", "-v", "in.txt"], &StyleProfile::GNU, TokenizerOptions::default())
///     .unwrap();
/// assert!(vals.get_bool("verbose"));
/// assert_eq!(vals.get_str("c"), "3");
/// assert_eq!(vals.get_str("input"), "in.txt");
/// ```
#[derive(Clone, Debug, Default)]
pub struct OptionSet {
    options:     Vec<OptionDecl>,
    positionals: Vec<PositionalDecl>,
}

impl OptionSet {
    pub fn new() -> OptionSet {
        OptionSet::default()
    }

    /// Declares an option. `long` doubles as the property name; an empty
    /// `long` declares a short-only option named after its short name.
    pub fn option(mut self, long: &str, short: Option<&str>, kind: OptionValueKind) -> OptionSet {
        let shorts: Vec<String> = short.into_iter().map(str::to_string).collect();
        let property: Arc<str> = match (long, shorts.first()) {
            ("", Some(s)) => Arc::from(s.as_str()),
            (long, _) => Arc::from(long),
        };
        self.options.push(OptionDecl {
            property,
            long: (!long.is_empty()).then(|| long.to_string()),
            shorts,
            kind,
        });
        self
    }

    /// Adds another short name to the most recently declared option.
    pub fn alias(mut self, short: &str) -> OptionSet {
        if let Some(decl) = self.options.last_mut() {
            decl.shorts.push(short.to_string());
        }
        self
    }

    pub fn flag(self, long: &str, short: Option<&str>) -> OptionSet {
        self.option(long, short, OptionValueKind::Boolean)
    }

    pub fn value(self, long: &str, short: Option<&str>) -> OptionSet {
        self.option(long, short, OptionValueKind::Normal)
    }

    pub fn list(self, long: &str, short: Option<&str>) -> OptionSet {
        self.option(long, short, OptionValueKind::List)
    }

    pub fn dict(self, long: &str, short: Option<&str>) -> OptionSet {
        self.option(long, short, OptionValueKind::Dictionary)
    }

    /// Declares the next single positional slot.
    pub fn positional(mut self, name: &str) -> OptionSet {
        self.positionals.push(PositionalDecl {
            property: Arc::from(name),
            variadic: false,
        });
        self
    }

    /// Declares a slot that takes every remaining positional argument.
    /// Slots declared after it are never filled.
    pub fn positionals(mut self, name: &str) -> OptionSet {
        self.positionals.push(PositionalDecl {
            property: Arc::from(name),
            variadic: true,
        });
        self
    }

    /// Parses `args` against this set.
    ///
    /// An unknown long option that is close to a declared one gets a
    /// "Did you mean" hint appended to its message.
    pub fn bind<S: AsRef<str>>(
        &self,
        args: &[S],
        style: &StyleProfile,
        options: TokenizerOptions,
    ) -> Result<Values, ParseFailure> {
        let mut binder = Binder::new(self);
        let result = tokenize(args, style, options, &mut binder);
        match result.into_result() {
            Ok(()) => Ok(binder.values),
            Err(mut e) => {
                if e.kind == ParseErrorKind::OptionalArgumentNotFound {
                    if let Some(name) = binder.last_long_miss.as_deref() {
                        if let Some(hint) = self.suggest(name, style) {
                            e.message = format!("{} {hint}", e.message);
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// A hint for a mistyped long option name, if a declared name (in any
    /// accepted spelling) is within two edits of it.
    pub fn suggest(&self, name: &str, style: &StyleProfile) -> Option<String> {
        let mut best: Option<(usize, String)> = None;
        for long in self.options.iter().filter_map(|o| o.long.as_deref()) {
            for spelling in style.naming_policy.spellings(long) {
                let dist = if style.case_sensitive {
                    strsim::levenshtein(name, &spelling)
                } else {
                    strsim::levenshtein(&name.to_lowercase(), &spelling.to_lowercase())
                };
                if dist < 3 && best.as_ref().map_or(true, |(d, _)| dist < *d) {
                    best = Some((dist, spelling.into_owned()));
                }
            }
        }
        let (_, spelling) = best?;
        Some(format!("Did you mean '{}{spelling}'?", long_prefix(style)))
    }

    fn option_by_index(&self, index: usize) -> Option<&OptionDecl> {
        self.options.get(index)
    }
}

fn long_prefix(style: &StyleProfile) -> &'static str {
    match style.option_prefix {
        OptionPrefix::DoubleDash | OptionPrefix::Any => "--",
        OptionPrefix::SingleDash => "-",
        OptionPrefix::Slash | OptionPrefix::SlashOrDash => "/",
    }
}

/// Collects values for one bind.
struct Binder<'s> {
    set:            &'s OptionSet,
    values:         Values,
    last_long_miss: Option<String>,
}

impl<'s> Binder<'s> {
    fn new(set: &'s OptionSet) -> Binder<'s> {
        let mut map = SynonymMap::new();
        let mut order = Vec::with_capacity(set.options.len() + set.positionals.len());
        for o in &set.options {
            map.insert(o.property.to_string(), Value::default_for(o.kind));
            order.push(o.property.to_string());
        }
        for p in &set.positionals {
            let default = if p.variadic {
                Value::List(vec![])
            } else {
                Value::Plain(None)
            };
            map.insert(p.property.to_string(), default);
            order.push(p.property.to_string());
        }
        for o in &set.options {
            for short in &o.shorts {
                map.insert_synonym(short.clone(), o.property.to_string());
            }
            let kebab = naming::to_kebab_case(&o.property);
            if *kebab != *o.property {
                map.insert_synonym(kebab.into_owned(), o.property.to_string());
            }
        }
        Binder {
            set,
            values: Values { map, order },
            last_long_miss: None,
        }
    }

    fn matched(&mut self, index: usize) -> OptionValueMatch {
        self.last_long_miss = None;
        let decl = &self.set.options[index];
        OptionValueMatch {
            property_name:  decl.property.clone(),
            property_index: index,
            value_kind:     decl.kind,
        }
    }
}

impl ParseCallbacks for Binder<'_> {
    fn match_long_option(
        &mut self,
        name: &str,
        case_sensitive: bool,
        naming_policy: NamingPolicy,
    ) -> Option<OptionValueMatch> {
        let longs = self
            .set
            .options
            .iter()
            .map(|o| o.long.as_deref().unwrap_or(""));
        match naming::resolve(longs, name, case_sensitive, naming_policy) {
            Some(i) => Some(self.matched(i)),
            None => {
                self.last_long_miss = Some(name.to_string());
                None
            }
        }
    }

    fn match_short_option(&mut self, name: &str, case_sensitive: bool) -> Option<OptionValueMatch> {
        let found = self.set.options.iter().position(|o| {
            o.shorts
                .iter()
                .any(|s| naming::eq_names(s, name, case_sensitive))
        });
        // A miss keeps any long miss of the same token for the hint.
        found.map(|i| self.matched(i))
    }

    fn match_positional(&mut self, _value: &str, index: usize) -> Option<PositionalValueMatch> {
        let (i, p) = self
            .set
            .positionals
            .iter()
            .enumerate()
            .find(|&(i, p)| i == index || (p.variadic && i < index))?;
        Some(PositionalValueMatch {
            property_name:  p.property.clone(),
            property_index: self.set.options.len() + i,
        })
    }

    fn assign_value(&mut self, property_name: &str, property_index: usize, key: Option<&str>, value: &str) {
        let Some(slot) = self.values.map.find_mut(property_name) else {
            debug!("no slot for property '{property_name}'");
            return;
        };
        match *slot {
            Value::Switch(ref mut b) => *b = value == "true",
            Value::Plain(ref mut v) => *v = Some(value.to_string()),
            Value::List(ref mut vs) => vs.push(value.to_string()),
            Value::Dict(ref mut kvs) => {
                let key = key.unwrap_or("");
                match kvs.iter_mut().find(|(k, _)| k == key) {
                    Some(kv) => kv.1 = value.to_string(),
                    None => kvs.push((key.to_string(), value.to_string())),
                }
            }
        }
        if let Some(decl) = self.set.option_by_index(property_index) {
            debug!("{} <- {value:?}", decl.property);
        }
    }
}
