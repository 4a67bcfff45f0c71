//! Document outline (bookmarks panel) built on top of `lopdf`.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// A bookmark requested while drawing: a title and the 0-based page it points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bookmark {
    /// Text shown in the outline.
    pub title: String,
    /// 0-based index into the document's pages.
    pub page_index: usize,
}

/// Errors raised while attaching an outline.
#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    /// The trailer has no `/Root` catalog reference.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    /// The catalog object is not a dictionary.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A bookmark refers to a page that was never created.
    #[error("bookmark {index} refers to missing page {page_index}")]
    MissingPage {
        /// Position of the bookmark in the request list.
        index: usize,
        /// Requested 0-based page.
        page_index: usize,
    },
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

/// Adds a flat outline whose entries open `/Dest [page /Fit]` on the recorded pages.
///
/// Does nothing when `bookmarks` is empty.
pub fn apply_bookmarks(
    document: &mut Document,
    page_ids: &[ObjectId],
    bookmarks: &[Bookmark],
) -> Result<(), BookmarkError> {
    if bookmarks.is_empty() {
        return Ok(());
    }

    let mut entries = Vec::with_capacity(bookmarks.len());
    for (index, bookmark) in bookmarks.iter().enumerate() {
        let page_ref = page_ids
            .get(bookmark.page_index)
            .copied()
            .ok_or(BookmarkError::MissingPage {
                index,
                page_index: bookmark.page_index,
            })?;
        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: bookmark.title.clone(),
        });
    }

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, document, &entries);
    insert_outlines_root(outlines_id, document, &entries)
}

fn link_outline_entries(outlines_id: ObjectId, document: &mut Document, entries: &[OutlineEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name(b"Fit".to_vec()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if let Some(next) = entries.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }

        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name(b"Outlines".to_vec()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn document_with_pages(count: usize) -> (Document, Vec<ObjectId>) {
        let mut document = Document::with_version("1.7");
        let page_ids: Vec<ObjectId> = (0..count)
            .map(|_| document.add_object(dictionary! { "Type" => "Page" }))
            .collect();
        let catalog_id = document.add_object(dictionary! { "Type" => "Catalog" });
        document.trailer.set("Root", catalog_id);
        (document, page_ids)
    }

    #[test]
    fn outline_entries_are_linked_in_order() {
        let (mut document, pages) = document_with_pages(3);
        let bookmarks = vec![
            Bookmark {
                title: "Cover".into(),
                page_index: 0,
            },
            Bookmark {
                title: "Page 1".into(),
                page_index: 1,
            },
            Bookmark {
                title: "Back Cover".into(),
                page_index: 2,
            },
        ];

        apply_bookmarks(&mut document, &pages, &bookmarks).expect("outline");

        let catalog_id = document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .expect("root");
        let catalog = document.get_dictionary(catalog_id).expect("catalog");
        let outlines_id = catalog
            .get(b"Outlines")
            .and_then(Object::as_reference)
            .expect("outlines ref");
        let outlines = document.get_dictionary(outlines_id).expect("outlines");
        assert_eq!(outlines.get(b"Count").and_then(Object::as_i64).ok(), Some(3));

        let first_id = outlines
            .get(b"First")
            .and_then(Object::as_reference)
            .expect("first");
        let first = document.get_dictionary(first_id).expect("first entry");
        assert!(first.get(b"Prev").is_err());
        assert!(first.get(b"Next").is_ok());
    }

    #[test]
    fn missing_page_is_reported() {
        let (mut document, pages) = document_with_pages(1);
        let err = apply_bookmarks(
            &mut document,
            &pages,
            &[Bookmark {
                title: "Nowhere".into(),
                page_index: 4,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, BookmarkError::MissingPage { page_index: 4, .. }));
    }

    #[test]
    fn no_bookmarks_leaves_catalog_untouched() {
        let (mut document, pages) = document_with_pages(1);
        apply_bookmarks(&mut document, &pages, &[]).expect("noop");
        let catalog_id = document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .expect("root");
        let catalog = document.get_dictionary(catalog_id).expect("catalog");
        assert!(catalog.get(b"Outlines").is_err());
    }
}
