use serde_json::Value;
use uuid::Uuid;

use crate::collection::model::{self, Collection, Info, SCHEMA_URL};
use crate::compile::Item;
use crate::spec::CollectionSpec;

/// The serialized artifact diverged from what was synthesized.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("exported collection is missing the item array")]
    MissingItems,

    #[error("exported item count ({exported}) does not match intended count ({intended})")]
    CountMismatch { exported: usize, intended: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Aggregate variables and items into the final collection document.
///
/// The wire model is serialized first, then `patch_items` re-imposes
/// the intended URL, headers and body on the serialized form. The
/// upstream collection toolchain is known to corrupt structured URLs on
/// output; the intended values are tracked independently of the
/// serializer and re-imposed after export.
pub fn assemble(spec: &CollectionSpec, items: &[Item]) -> Result<Value, ExportError> {
    let collection = Collection {
        info: Info {
            id: Uuid::new_v4().to_string(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            schema: SCHEMA_URL.to_string(),
        },
        variable: spec.variables.clone(),
        item: items.iter().map(to_model).collect(),
    };

    let mut exported = serde_json::to_value(&collection)?;
    patch_items(&mut exported, items)?;

    Ok(exported)
}

fn to_model(item: &Item) -> model::Item {
    model::Item {
        name: item.name.clone(),
        request: model::Request {
            method: item.method.clone(),
            header: item.headers.clone(),
            url: item.url.clone(),
            body: item.body.clone(),
        },
        event: vec![model::Event::test(item.script.clone())],
    }
}

/// Overwrite each serialized item's request URL, headers and body with
/// the intended values, field by field and in item order.
///
/// The item count is re-verified first; a mismatch means the serializer
/// broke its contract and the run must halt before anything is written.
pub fn patch_items(exported: &mut Value, items: &[Item]) -> Result<(), ExportError> {
    let exported_items = exported
        .get_mut("item")
        .and_then(Value::as_array_mut)
        .ok_or(ExportError::MissingItems)?;

    if exported_items.len() != items.len() {
        return Err(ExportError::CountMismatch {
            exported: exported_items.len(),
            intended: items.len(),
        });
    }

    for (serialized, intended) in exported_items.iter_mut().zip(items) {
        let Some(request) = serialized.get_mut("request").filter(|r| r.is_object()) else {
            continue;
        };

        request["url"] = serde_json::to_value(&intended.url)?;
        request["header"] = serde_json::to_value(&intended.headers)?;
        if let Some(request_body) = &intended.body {
            request["body"] = serde_json::to_value(request_body)?;
        }
    }

    Ok(())
}
