//! Scalar property application
//!
//! Writes the text values of one `RequestProperty` onto its content node.
//!
//! The stored type is the type hint if one was given, otherwise the type of the
//! existing property, otherwise `String`. A property becomes multi-valued when
//! the hint ends in `[]`, several values were submitted, or (without a hint)
//! the existing property already is an array. A single empty value removes a
//! single-valued property.

use crate::models::{Content, Modification, PropertyType, PropertyValue, RequestProperty};
use crate::services::date_parser::DateParser;
use crate::services::error::PostError;
use std::sync::Arc;

pub struct PropertyValueHandler {
    date_parser: Arc<DateParser>,
}

impl PropertyValueHandler {
    pub fn new(date_parser: Arc<DateParser>) -> Self {
        Self { date_parser }
    }

    /// Apply `prop` to `content`, recording what changed in `changes`
    pub fn set_property(
        &self,
        content: &mut Content,
        prop: &RequestProperty,
        changes: &mut Vec<Modification>,
    ) -> Result<(), PostError> {
        let values = prop.string_values();
        let existing = content.property(prop.name());
        let hint = prop.parsed_type_hint();

        let (property_type, hint_multi) = match hint {
            Some(parsed) => parsed,
            None => (
                existing
                    .map(PropertyValue::property_type)
                    .unwrap_or(PropertyType::String),
                false,
            ),
        };
        let multi = hint_multi
            || values.len() > 1
            || (hint.is_none() && existing.map(PropertyValue::is_array).unwrap_or(false));

        if values.is_empty() && prop.ignores_blanks() {
            tracing::debug!("Nothing left to write for {} after ignoring blanks", prop.path());
            return Ok(());
        }

        if !multi && values.first().map(|v| v.is_empty()).unwrap_or(true) {
            if content.remove_property(prop.name()).is_some() {
                changes.push(Modification::on_deleted(prop.path()));
            }
            return Ok(());
        }

        let value = if multi {
            let converted = values
                .iter()
                .map(|raw| self.convert(property_type, raw, prop))
                .collect::<Result<Vec<_>, _>>()?;
            PropertyValue::Array(converted)
        } else {
            self.convert(property_type, &values[0], prop)?
        };

        content.set_property(prop.name(), value);
        changes.push(Modification::on_modified(prop.path()));
        Ok(())
    }

    fn convert(
        &self,
        property_type: PropertyType,
        raw: &str,
        prop: &RequestProperty,
    ) -> Result<PropertyValue, PostError> {
        let invalid = || PostError::invalid_property_value(prop.path(), raw, property_type);
        Ok(match property_type {
            PropertyType::String => PropertyValue::String(raw.to_string()),
            PropertyType::Long => {
                PropertyValue::Long(raw.trim().parse::<i64>().map_err(|_| invalid())?)
            }
            PropertyType::Double => {
                PropertyValue::Double(raw.trim().parse::<f64>().map_err(|_| invalid())?)
            }
            PropertyType::Boolean => PropertyValue::Boolean(raw.trim().eq_ignore_ascii_case("true")),
            PropertyType::Reference => PropertyValue::Reference(raw.trim().to_string()),
            PropertyType::Date => match self.date_parser.parse(raw) {
                Some(date) => PropertyValue::Date(date),
                None => {
                    tracing::warn!(
                        "Could not parse '{}' as a date for {}, storing it as a string",
                        raw,
                        prop.path()
                    );
                    PropertyValue::String(raw.to_string())
                }
            },
        })
    }
}
