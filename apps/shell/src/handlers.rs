use crate::args::Input;
use anyhow::{Context, Result, bail};
use cdmi_storage::{DataObject, DataObjectDraft, ObjectStore, Operation};
use serde_json::{Value, json};
use tracing::debug;

pub(crate) async fn put(
    store: &ObjectStore,
    path: &str,
    mime: Option<String>,
    id: Option<String>,
    metadata: Vec<(String, String)>,
    input: Input,
) -> Result<Value> {
    let mut draft = DataObjectDraft::new(read_input(input).await?);
    if let Some(mime) = mime {
        draft = draft.mimetype(mime);
    }
    if let Some(id) = id {
        draft = draft.object_id(id);
    }
    for (key, value) in metadata {
        draft = draft.metadata(key, value);
    }

    let object = store.create_by_path(path, draft).await?;
    Ok(render(&object, false))
}

pub(crate) async fn put_raw(
    store: &ObjectStore,
    path: &str,
    content_type: &str,
    input: Input,
) -> Result<Value> {
    let draft = DataObjectDraft::new(read_input(input).await?);
    let object = store.create_non_cdmi_by_path(path, content_type, draft).await?;
    Ok(render(&object, false))
}

pub(crate) async fn get(store: &ObjectStore, path: &str) -> Result<Value> {
    match store.find_by_path(path).await? {
        Some(object) => Ok(render(&object, true)),
        None => bail!("Object {path} not found"),
    }
}

pub(crate) fn capabilities(store: &ObjectStore) -> Value {
    let (supported, unsupported): (Vec<_>, Vec<_>) =
        Operation::ALL.into_iter().partition(|op| store.supports(*op));

    json!({
        "supported": supported.iter().map(|op| op.name()).collect::<Vec<_>>(),
        "unsupported": unsupported.iter().map(|op| op.name()).collect::<Vec<_>>(),
    })
}

async fn read_input(input: Input) -> Result<String> {
    match (input.value, input.file) {
        (Some(value), _) => Ok(value),
        (None, Some(file)) => {
            debug!(file = %file.display(), "Reading object value");
            tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))
        },
        (None, None) => bail!("No object value given"),
    }
}

fn render(object: &DataObject, with_value: bool) -> Value {
    let mut rendered = json!({
        "objectID": object.object_id(),
        "capabilitiesURI": object.capabilities_uri(),
        "mimetype": object.mimetype(),
        "metadata": object.metadata().to_map(),
    });
    if with_value {
        rendered["value"] = Value::String(object.value().to_owned());
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store(temp: &TempDir) -> ObjectStore {
        ObjectStore::builder().base_directory(temp.path()).connect().await.unwrap()
    }

    fn inline(value: &str) -> Input {
        Input { value: Some(value.to_owned()), file: None }
    }

    #[tokio::test]
    async fn put_then_get_renders_value_and_metadata() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).await;

        let created = put(
            &store,
            "note",
            Some("text/markdown".to_owned()),
            Some("fixedid1".to_owned()),
            vec![("owner".to_owned(), "ops".to_owned())],
            inline("# hi"),
        )
        .await
        .unwrap();
        assert_eq!(created["objectID"], "fixedid1");
        assert!(created.get("value").is_none());

        let found = get(&store, "note").await.unwrap();
        assert_eq!(found["value"], "# hi");
        assert_eq!(found["mimetype"], "text/markdown");
        assert_eq!(found["metadata"]["owner"], "ops");
        assert_eq!(found["metadata"]["cdmi_size"], "4");
    }

    #[tokio::test]
    async fn put_raw_reads_value_from_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).await;
        let source = TempDir::new().unwrap();
        let file = source.path().join("q3.csv");
        std::fs::write(&file, "a,b\n").unwrap();

        let created =
            put_raw(&store, "q3.csv", "text/csv", Input { value: None, file: Some(file) })
                .await
                .unwrap();

        assert_eq!(created["mimetype"], "text/csv");
        assert_eq!(created["metadata"]["cdmi_size"], "4");
    }

    #[tokio::test]
    async fn get_missing_object_fails() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp).await;

        let err = get(&store, "absent").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn capabilities_split_by_support() {
        let temp = TempDir::new().unwrap();
        let report = capabilities(&store(&temp).await);

        assert_eq!(report["supported"], json!(["createByPath", "createNonCDMIByPath", "findByPath"]));
        assert_eq!(report["unsupported"], json!(["createById", "deleteByPath", "findByObjectId"]));
    }
}
