//! Record types: individuals, families, sources, notes and repositories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::Date;

pub const TAG_BIRTH: &str = "BIRT";
pub const TAG_DEATH: &str = "DEAT";
pub const TAG_MARRIAGE: &str = "MARR";

/// One line of the flat structural view of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Line {
    pub level: u8,
    pub tag: String,
    pub value: String,
    /// 1-based line number in the source file.
    pub line_number: usize,
}

impl Line {
    #[must_use]
    pub fn new(level: u8, tag: &str, value: &str, line_number: usize) -> Self {
        Self {
            level,
            tag: tag.to_owned(),
            value: value.to_owned(),
            line_number,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "X")]
    Intersex,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Sex {
    /// Whether a sex was actually recorded.
    #[must_use]
    pub fn is_specified(self) -> bool {
        self != Self::Unknown
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub tag: String,
    pub date: Option<Date>,
    pub place: Option<String>,
}

impl Event {
    #[must_use]
    pub fn new(tag: &str, date: Option<Date>) -> Self {
        Self {
            tag: tag.to_owned(),
            date,
            place: None,
        }
    }

    #[must_use]
    pub fn with_place(mut self, place: &str) -> Self {
        self.place = Some(place.to_owned());
        self
    }

    #[must_use]
    pub fn has_place(&self) -> bool {
        self.place.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// A personal name as recorded, optionally with structured parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalName {
    /// The combined form, e.g. `"John /Doe/"`.
    pub full: String,
    pub given: Option<String>,
    pub surname: Option<String>,
}

impl PersonalName {
    #[must_use]
    pub fn new(full: &str) -> Self {
        Self {
            full: full.to_owned(),
            given: None,
            surname: None,
        }
    }

    /// Given name: the structured field if present, else the text before the
    /// first `/` of the combined form.
    #[must_use]
    pub fn given_name(&self) -> &str {
        match self.given.as_deref().map(str::trim) {
            Some(given) if !given.is_empty() => given,
            _ => split_combined(&self.full).0,
        }
    }

    /// Surname: the structured field if present, else the text between the
    /// slashes of the combined form.
    #[must_use]
    pub fn surname(&self) -> Option<&str> {
        match self.surname.as_deref().map(str::trim) {
            Some(surname) if !surname.is_empty() => Some(surname),
            _ => split_combined(&self.full).1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.trim().is_empty()
            && self.given.as_deref().is_none_or(|g| g.trim().is_empty())
            && self.surname.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

fn split_combined(full: &str) -> (&str, Option<&str>) {
    let Some(start) = full.find('/') else {
        return (full.trim(), None);
    };
    let rest = &full[start + 1..];
    let end = rest.find('/').unwrap_or(rest.len());
    let surname = rest[..end].trim();
    let given = full[..start].trim();
    (given, (!surname.is_empty()).then_some(surname))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Individual {
    pub xref: String,
    pub names: Vec<PersonalName>,
    pub sex: Sex,
    pub events: Vec<Event>,
    /// Families in which this individual is a child.
    pub famc: Vec<String>,
    /// Families in which this individual is a spouse.
    pub fams: Vec<String>,
    pub sources: Vec<String>,
    pub notes: Vec<String>,
    pub associations: Vec<String>,
    pub lines: Vec<Line>,
}

impl Individual {
    #[must_use]
    pub fn new(xref: &str) -> Self {
        Self {
            xref: xref.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, full: &str) -> Self {
        self.names.push(PersonalName::new(full));
        self
    }

    #[must_use]
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn with_birth(self, date: Date) -> Self {
        self.with_event(Event::new(TAG_BIRTH, Some(date)))
    }

    #[must_use]
    pub fn with_death(self, date: Date) -> Self {
        self.with_event(Event::new(TAG_DEATH, Some(date)))
    }

    #[must_use]
    pub fn child_of(mut self, family: &str) -> Self {
        self.famc.push(family.to_owned());
        self
    }

    #[must_use]
    pub fn spouse_in(mut self, family: &str) -> Self {
        self.fams.push(family.to_owned());
        self
    }

    #[must_use]
    pub fn citing(mut self, source: &str) -> Self {
        self.sources.push(source.to_owned());
        self
    }

    #[must_use]
    pub fn primary_name(&self) -> Option<&PersonalName> {
        self.names.first()
    }

    #[must_use]
    pub fn event(&self, tag: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.tag == tag)
    }

    #[must_use]
    pub fn birth(&self) -> Option<&Event> {
        self.event(TAG_BIRTH)
    }

    #[must_use]
    pub fn death(&self) -> Option<&Event> {
        self.event(TAG_DEATH)
    }

    #[must_use]
    pub fn birth_date(&self) -> Option<Date> {
        self.birth().and_then(|e| e.date)
    }

    #[must_use]
    pub fn death_date(&self) -> Option<Date> {
        self.death().and_then(|e| e.date)
    }

    /// Birth year, if the birth date carries one.
    #[must_use]
    pub fn birth_year(&self) -> Option<i32> {
        self.birth_date().filter(Date::has_year).map(|d| d.year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Family {
    pub xref: String,
    pub husband: Option<String>,
    pub wife: Option<String>,
    pub children: Vec<String>,
    pub sources: Vec<String>,
    pub notes: Vec<String>,
    pub events: Vec<Event>,
    pub lines: Vec<Line>,
}

impl Family {
    #[must_use]
    pub fn new(xref: &str) -> Self {
        Self {
            xref: xref.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_husband(mut self, xref: &str) -> Self {
        self.husband = Some(xref.to_owned());
        self
    }

    #[must_use]
    pub fn with_wife(mut self, xref: &str) -> Self {
        self.wife = Some(xref.to_owned());
        self
    }

    #[must_use]
    pub fn with_child(mut self, xref: &str) -> Self {
        self.children.push(xref.to_owned());
        self
    }

    #[must_use]
    pub fn with_marriage(mut self, date: Date) -> Self {
        self.events.push(Event::new(TAG_MARRIAGE, Some(date)));
        self
    }

    #[must_use]
    pub fn marriage_date(&self) -> Option<Date> {
        self.events
            .iter()
            .find(|e| e.tag == TAG_MARRIAGE)
            .and_then(|e| e.date)
    }

    /// Husband then wife, skipping absent or empty links.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        [self.husband.as_deref(), self.wife.as_deref()]
            .into_iter()
            .flatten()
            .filter(|x| !x.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub xref: String,
    pub title: String,
    pub repository: Option<String>,
    pub notes: Vec<String>,
    pub lines: Vec<Line>,
}

impl Source {
    #[must_use]
    pub fn new(xref: &str, title: &str) -> Self {
        Self {
            xref: xref.to_owned(),
            title: title.to_owned(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub xref: String,
    pub text: String,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub xref: String,
    pub name: String,
    pub notes: Vec<String>,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Individual,
    Family,
    Source,
    Note,
    Repository,
}

impl RecordKind {
    /// Level-0 tag for this kind of record.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Individual => "INDI",
            Self::Family => "FAM",
            Self::Source => "SOUR",
            Self::Note => "NOTE",
            Self::Repository => "REPO",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A borrowed record of any kind.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    Individual(&'a Individual),
    Family(&'a Family),
    Source(&'a Source),
    Note(&'a Note),
    Repository(&'a Repository),
}

impl<'a> Record<'a> {
    #[must_use]
    pub fn xref(&self) -> &'a str {
        match self {
            Self::Individual(r) => &r.xref,
            Self::Family(r) => &r.xref,
            Self::Source(r) => &r.xref,
            Self::Note(r) => &r.xref,
            Self::Repository(r) => &r.xref,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Individual(_) => RecordKind::Individual,
            Self::Family(_) => RecordKind::Family,
            Self::Source(_) => RecordKind::Source,
            Self::Note(_) => RecordKind::Note,
            Self::Repository(_) => RecordKind::Repository,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &'a [Line] {
        match self {
            Self::Individual(r) => &r.lines,
            Self::Family(r) => &r.lines,
            Self::Source(r) => &r.lines,
            Self::Note(r) => &r.lines,
            Self::Repository(r) => &r.lines,
        }
    }

    /// Note pointers held by the record. Note records hold none.
    #[must_use]
    pub fn notes(&self) -> &'a [String] {
        match self {
            Self::Individual(r) => &r.notes,
            Self::Family(r) => &r.notes,
            Self::Source(r) => &r.notes,
            Self::Repository(r) => &r.notes,
            Self::Note(_) => &[],
        }
    }
}
