use std::fmt::{Error, Result, Write as _};

use super::{FieldDef, FieldKind, FormSchema};

/// Format a schema in a readable style:
/// input fields are rendered in one line, summation fields are pretty-printed
/// with their source list.
pub fn format_form_schema(schema: &FormSchema) -> std::result::Result<String, Error> {
    let mut out = String::new();

    for field in schema.fields() {
        format_field(field, &mut out)?;
    }

    Ok(out)
}

fn format_field(field: &FieldDef, out: &mut String) -> Result {
    match &field.kind {
        FieldKind::Summation(def) => {
            let pad = " ".repeat(4);
            writeln!(out, "{}:", field.id)?;
            writeln!(out, "{pad}type: {}", field.element_type())?;
            writeln!(out, "{pad}title: {:?}", field.title)?;
            if def.sources().is_empty() {
                writeln!(out, "{pad}sources: []")?;
            } else {
                writeln!(out, "{pad}sources:")?;
                for source in def.sources() {
                    writeln!(out, "{pad}    - {source}")?;
                }
            }
        }
        _ => {
            writeln!(
                out,
                "{}: {{ type: {}, title: {:?} }}",
                field.id,
                field.element_type(),
                field.title
            )?;
        }
    }
    Ok(())
}
