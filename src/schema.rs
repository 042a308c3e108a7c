//! Field declarations and the record walker.
//!
//! A record describes itself by implementing [`Configure`]: it hands a mutable
//! reference to each of its fields to a [`Fields`] collector together with the
//! field's metadata. Nested records are declared with [`Fields::group`] and
//! walked breadth first, so every leaf of a record is listed before the leaves
//! of its groups.
//!
//! The walker turns declarations into [`FieldDescriptor`]s: dotted path,
//! fully prefixed environment names, and a write handle into the record.

use std::collections::VecDeque;
use std::str::FromStr;

use crate::coerce::{
    DEFAULT_SEPARATOR, FromStrSlot, OpaqueSlot, Setter, SetterSlot, Slot, ValueSlot,
};
use crate::error::{BoxError, SchemaError};
use crate::value::EnvValue;

/// A configuration record.
///
/// ```ignore
/// impl Configure for AppConfig {
///     fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
///         f.field("port", &mut self.port).env("PORT,APP_PORT").default("8080");
///         f.field("debug", &mut self.debug).env("DEBUG").updatable();
///         f.group("database", &mut self.database).prefix("DB_");
///     }
/// }
/// ```
pub trait Configure {
    /// Declare every field of the record.
    fn fields<'a>(&'a mut self, f: &mut Fields<'a>);

    /// Called once per population pass, after the declarations were checked
    /// and before any field is assigned.
    fn refresh(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FieldSpec {
    name: String,
    env: Option<String>,
    default: Option<String>,
    required: bool,
    separator: Option<String>,
    layout: Option<String>,
    updatable: bool,
    description: Option<String>,
}

struct Leaf<'a> {
    spec: FieldSpec,
    target: Box<dyn Slot + 'a>,
}

struct Group<'a> {
    name: String,
    prefix: String,
    record: &'a mut dyn Configure,
}

/// Collector passed to [`Configure::fields`].
///
/// Each declaration method picks how the raw string becomes the field's value;
/// all of them try a parser registered in [`Parsers`](crate::Parsers) first.
pub struct Fields<'a> {
    leaves: Vec<Leaf<'a>>,
    groups: Vec<Group<'a>>,
}

impl<'a> Fields<'a> {
    fn new() -> Self {
        Self {
            leaves: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// A field whose type implements [`EnvValue`]: scalars, `Option`, `Vec`,
    /// maps, timestamps, URLs and time zones.
    pub fn field<T: EnvValue>(
        &mut self,
        name: impl Into<String>,
        target: &'a mut T,
    ) -> FieldBuilder<'_> {
        self.push(name.into(), Box::new(ValueSlot(target)))
    }

    /// A field parsed with its `FromStr` implementation.
    pub fn parsed<T>(&mut self, name: impl Into<String>, target: &'a mut T) -> FieldBuilder<'_>
    where
        T: FromStr + Default + PartialEq + 'static,
        T::Err: std::fmt::Display,
    {
        self.push(name.into(), Box::new(FromStrSlot(target)))
    }

    /// A field that updates itself through [`Setter`].
    pub fn setter<T>(&mut self, name: impl Into<String>, target: &'a mut T) -> FieldBuilder<'_>
    where
        T: Setter + Default + PartialEq + 'static,
    {
        self.push(name.into(), Box::new(SetterSlot(target)))
    }

    /// A field with no text coercion of its own. It can only be populated
    /// through a registered parser; otherwise population fails with
    /// [`ParseError::UnsupportedType`](crate::error::ParseError::UnsupportedType).
    pub fn opaque<T>(&mut self, name: impl Into<String>, target: &'a mut T) -> FieldBuilder<'_>
    where
        T: Default + PartialEq + 'static,
    {
        self.push(name.into(), Box::new(OpaqueSlot(target)))
    }

    /// A nested record. Its leaves are walked after the leaves of this one.
    pub fn group<C: Configure + 'a>(
        &mut self,
        name: impl Into<String>,
        record: &'a mut C,
    ) -> GroupBuilder<'_> {
        let idx = self.groups.len();
        self.groups.push(Group {
            name: name.into(),
            prefix: String::new(),
            record,
        });
        GroupBuilder {
            prefix: &mut self.groups[idx].prefix,
        }
    }

    fn push(&mut self, name: String, target: Box<dyn Slot + 'a>) -> FieldBuilder<'_> {
        let idx = self.leaves.len();
        self.leaves.push(Leaf {
            spec: FieldSpec {
                name,
                ..FieldSpec::default()
            },
            target,
        });
        FieldBuilder {
            spec: &mut self.leaves[idx].spec,
        }
    }
}

/// Metadata of one declared field.
pub struct FieldBuilder<'f> {
    spec: &'f mut FieldSpec,
}

impl FieldBuilder<'_> {
    /// Comma-separated environment variable names, highest priority first.
    /// The first name is the primary one; the rest are alternatives.
    pub fn env(self, names: impl Into<String>) -> Self {
        self.spec.env = Some(names.into());
        self
    }

    /// Raw value coerced into the field when no variable is set and the field
    /// still holds its zero value.
    pub fn default(self, raw: impl Into<String>) -> Self {
        self.spec.default = Some(raw.into());
        self
    }

    /// Fail population when no variable is set and the field is still zero.
    pub fn required(self) -> Self {
        self.spec.required = true;
        self
    }

    /// Separator for sequence and mapping fields (default `,`).
    pub fn separator(self, sep: impl Into<String>) -> Self {
        self.spec.separator = Some(sep.into());
        self
    }

    /// Layout for timestamp fields, as a `chrono` strftime pattern.
    pub fn layout(self, layout: impl Into<String>) -> Self {
        self.spec.layout = Some(layout.into());
        self
    }

    /// Include the field in update-only passes.
    pub fn updatable(self) -> Self {
        self.spec.updatable = true;
        self
    }

    pub fn description(self, text: impl Into<String>) -> Self {
        self.spec.description = Some(text.into());
        self
    }
}

/// Metadata of one nested record.
pub struct GroupBuilder<'f> {
    prefix: &'f mut String,
}

impl GroupBuilder<'_> {
    /// Prepended to every environment name inside the group, after the
    /// prefixes of the enclosing groups.
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        *self.prefix = prefix.into();
        self
    }
}

/// One leaf field as seen by population and the renderer.
pub(crate) struct FieldDescriptor<'a> {
    /// Dotted path from the root, e.g. `database.host`.
    pub(crate) path: String,
    /// Fully prefixed names in priority order. Empty when the field declares
    /// no environment variables.
    pub(crate) source_names: Vec<String>,
    pub(crate) target: Box<dyn Slot + 'a>,
    pub(crate) default: Option<String>,
    pub(crate) layout: Option<String>,
    pub(crate) separator: String,
    pub(crate) description: Option<String>,
    pub(crate) updatable: bool,
    pub(crate) required: bool,
}

impl FieldDescriptor<'_> {
    pub(crate) fn primary(&self) -> Option<&str> {
        self.source_names.first().map(String::as_str)
    }
}

/// Walk `root` breadth first and collect its leaf descriptors.
///
/// `prefix` seeds the accumulated environment prefix.
pub(crate) fn walk<'a>(
    root: &'a mut dyn Configure,
    prefix: &str,
) -> Result<Vec<FieldDescriptor<'a>>, SchemaError> {
    let mut out = Vec::new();
    let mut queue: VecDeque<(&'a mut dyn Configure, String, String)> = VecDeque::new();
    queue.push_back((root, prefix.to_string(), String::new()));

    while let Some((record, prefix, path)) = queue.pop_front() {
        let mut fields = Fields::new();
        record.fields(&mut fields);

        for leaf in fields.leaves {
            out.push(describe_leaf(leaf, &prefix, &path)?);
        }
        for group in fields.groups {
            queue.push_back((
                group.record,
                format!("{prefix}{}", group.prefix),
                join_path(&path, &group.name),
            ));
        }
    }
    Ok(out)
}

fn describe_leaf<'a>(
    leaf: Leaf<'a>,
    prefix: &str,
    parent: &str,
) -> Result<FieldDescriptor<'a>, SchemaError> {
    let Leaf { spec, target } = leaf;
    let path = join_path(parent, &spec.name);

    let mut source_names = Vec::new();
    if let Some(list) = &spec.env {
        for name in list.split(',') {
            if name.is_empty() {
                return Err(SchemaError::EmptySourceName { field: path });
            }
            source_names.push(format!("{prefix}{name}"));
        }
    }

    let separator = match spec.separator {
        Some(sep) if sep.is_empty() => return Err(SchemaError::EmptySeparator { field: path }),
        Some(sep) => sep,
        None => DEFAULT_SEPARATOR.to_string(),
    };

    Ok(FieldDescriptor {
        path,
        source_names,
        target,
        default: spec.default,
        layout: spec.layout,
        separator,
        description: spec.description,
        updatable: spec.updatable,
        required: spec.required,
    })
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
