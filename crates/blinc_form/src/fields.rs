//! Form fields
//!
//! The input elements of a mounted form: each has a dotted `name`, a current
//! value and the initial value it returns to on reset. Taking a
//! [`snapshot`](FormFields::snapshot) yields the same entries a browser's
//! `FormData` would: disabled fields and unchecked checkboxes or radios are
//! left out.
//!
//! Several fields may share a name (a radio group, a hidden fallback in front
//! of a checkbox). Their entries are expanded in registration order, so the
//! last submitted one wins.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::codec;
use crate::error::{FormError, Result};
use crate::path::FieldPath;
use crate::value::{FormValue, ValueTree};

/// Value submitted by a checked checkbox with no explicit value
pub const DEFAULT_CHECKBOX_VALUE: &str = "on";

/// Kind of input element
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Any text-like input (text, email, password, textarea, select, hidden)
    Text,
    /// Checkbox submitting `value` while checked
    Checkbox { value: String },
    /// Radio button submitting `value` while checked. Checking one unchecks
    /// the other radios sharing its name.
    Radio { value: String },
}

/// A single registered input
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    path: FieldPath,
    kind: FieldKind,
    value: String,
    initial_value: String,
    checked: bool,
    initial_checked: bool,
    disabled: bool,
}

impl Field {
    fn new(name: &str, kind: FieldKind, value: String, checked: bool) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            path: FieldPath::parse(name)?,
            kind,
            value: value.clone(),
            initial_value: value,
            checked,
            initial_checked: checked,
            disabled: false,
        })
    }

    /// A text input with an initial value
    pub fn text(name: &str, initial: impl Into<String>) -> Result<Self> {
        Self::new(name, FieldKind::Text, initial.into(), false)
    }

    /// A checkbox, submitting `"on"` while checked
    pub fn checkbox(name: &str, checked: bool) -> Result<Self> {
        let value = DEFAULT_CHECKBOX_VALUE.to_string();
        Self::new(name, FieldKind::Checkbox { value: value.clone() }, value, checked)
    }

    /// One option of a radio group
    pub fn radio(name: &str, value: impl Into<String>, checked: bool) -> Result<Self> {
        let value = value.into();
        Self::new(name, FieldKind::Radio { value: value.clone() }, value, checked)
    }

    /// Set the value a checkbox submits
    pub fn checkbox_value(mut self, value: impl Into<String>) -> Self {
        if let FieldKind::Checkbox { value: submitted } = &mut self.kind {
            *submitted = value.into();
            self.value = submitted.clone();
            self.initial_value = submitted.clone();
        }
        self
    }

    /// Disabled fields are never submitted
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the field is a checkbox or radio
    pub fn is_checkable(&self) -> bool {
        !matches!(self.kind, FieldKind::Text)
    }

    fn is_radio(&self) -> bool {
        matches!(self.kind, FieldKind::Radio { .. })
    }

    /// Entry this field contributes to a submission, if any
    pub fn entry(&self) -> Option<(FieldPath, FormValue)> {
        if self.disabled {
            return None;
        }
        match &self.kind {
            FieldKind::Text => Some((self.path.clone(), FormValue::text(&self.value))),
            FieldKind::Checkbox { value } | FieldKind::Radio { value } if self.checked => {
                Some((self.path.clone(), FormValue::text(value)))
            }
            FieldKind::Checkbox { .. } | FieldKind::Radio { .. } => None,
        }
    }

    fn reset(&mut self) {
        self.value = self.initial_value.clone();
        self.checked = self.initial_checked;
    }
}

/// All inputs of a form, in registration (document) order
#[derive(Clone, Debug, Default)]
pub struct FormFields {
    fields: Vec<Field>,
    by_name: FxHashMap<String, SmallVec<[usize; 1]>>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field after any existing ones
    pub fn add(&mut self, field: Field) {
        self.by_name
            .entry(field.name.clone())
            .or_default()
            .push(self.fields.len());
        self.fields.push(field);
    }

    /// The last field registered under `name`
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.named(name).last()
    }

    /// Every field registered under `name`, in registration order
    pub fn named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Field> + 'a {
        let indices = self.by_name.get(name).map(|i| i.as_slice()).unwrap_or(&[]);
        indices.iter().map(move |&index| &self.fields[index])
    }

    fn indices(&self, name: &str) -> Result<SmallVec<[usize; 1]>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Set the value of the last text input named `name`
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<&Field> {
        let index = self
            .indices(name)?
            .into_iter()
            .rev()
            .find(|&index| !self.fields[index].is_checkable())
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let field = &mut self.fields[index];
        field.value = value.into();
        Ok(&*field)
    }

    /// Check or uncheck the checkboxes and radios named `name`.
    ///
    /// With `value`, only the option submitting that value is touched.
    /// Checking a radio unchecks the other radios of its group. Returns the
    /// last field touched.
    pub fn set_checked(&mut self, name: &str, value: Option<&str>, checked: bool) -> Result<&Field> {
        let indices = self.indices(name)?;

        let mut target = None;
        for &index in &indices {
            let field = &mut self.fields[index];
            if field.is_checkable() && value.map_or(true, |v| field.value == v) {
                field.checked = checked;
                target = Some(index);
            }
        }
        let target = target.ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        if checked && self.fields[target].is_radio() {
            for &index in &indices {
                if index != target && self.fields[index].is_radio() {
                    self.fields[index].checked = false;
                }
            }
        }
        Ok(&self.fields[target])
    }

    /// Enable or disable every field named `name`
    pub fn set_disabled(&mut self, name: &str, disabled: bool) -> Result<()> {
        for index in self.indices(name)? {
            self.fields[index].disabled = disabled;
        }
        Ok(())
    }

    /// Restore every field to its initial state
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.reset();
        }
    }

    /// Submittable entries in document order
    pub fn entries(&self) -> impl Iterator<Item = (FieldPath, FormValue)> + '_ {
        self.fields.iter().filter_map(Field::entry)
    }

    /// Current contents as a nested [`ValueTree`]
    pub fn snapshot(&self) -> ValueTree {
        codec::expand_entries(self.entries())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
