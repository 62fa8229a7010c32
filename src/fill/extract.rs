use crate::document::adapter::DocumentAdapter;
use crate::error::DocumentError;
use crate::profile::profile_model::FormEntry;

/// Capture the populated controls of the first visible form.
///
/// Each entry is keyed by the first non-blank of label text, name,
/// placeholder and id. Controls with an empty value or no usable key are
/// skipped.
pub fn extract_form_data<D>(doc: &mut D) -> Result<Vec<FormEntry>, DocumentError>
where
    D: DocumentAdapter + ?Sized,
{
    let mut entries = Vec::new();

    for handle in doc.first_form_inputs()? {
        let attrs = doc.attributes(handle)?;
        let value = match attrs.value {
            Some(v) if !v.is_empty() => v,
            _ => continue,
        };

        let label = doc.associated_label_text(handle)?;
        let key = [label, attrs.name, attrs.placeholder, attrs.id]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty());

        if let Some(key) = key {
            entries.push(FormEntry { key, value });
        }
    }

    Ok(entries)
}
