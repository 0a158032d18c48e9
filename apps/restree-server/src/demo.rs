use std::sync::Arc;

use restree::{Blob, Directory, JsonTree, MemoryCollection, MimeType, ResourceRef};
use serde_json::json;

/// Tree served by the binary: a read-only catalog, a writable collection and a text blob.
pub fn demo_tree() -> ResourceRef {
    let fruits = json!({
        "apple": {"color": "red", "name": "apple"},
        "banana": {"color": "yellow", "name": "banana"},
        "cherry": {"color": "red", "name": "cherry"},
    });
    let notes = MemoryCollection::new().with_document(
        "welcome",
        json!({"title": "welcome", "text": "PUT, POST and DELETE documents here"}),
    );
    let readme = Blob::new(
        MimeType::new("text", "plain"),
        "restree demo server\nGET / to browse\n",
    );

    Arc::new(
        Directory::new()
            .with_body(json!({"service": "restree"}))
            .with_child("fruits", JsonTree::shared(fruits))
            .with_child("notes", Arc::new(notes))
            .with_child("readme", Arc::new(readme)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use restree::{Request, ResourceService};

    #[test]
    fn demo_tree_resolves() {
        let service = ResourceService::new(demo_tree());
        let resp = service.dispatch(Request::new(http::Method::GET, "/fruits/apple"));
        assert_eq!(resp.status, http::StatusCode::OK);
        assert_eq!(resp.json().unwrap()["color"], "red");

        let resp = service.dispatch(Request::new(http::Method::GET, "/"));
        let body = resp.json().unwrap();
        assert_eq!(body["service"], "restree");
        assert_eq!(body["_items"].as_array().unwrap().len(), 3);
    }
}
