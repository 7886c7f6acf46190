//! Export pipeline tests against an in-memory note store.
//!
//! The fake store records every hydration call so tests can check ordering,
//! fetch flags and where a failing run stopped.

mod common;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use common::harness::TestNote;
use common::PNG_BYTES;
use noteport::domain::{Guid, Note, NoteSummary};
use noteport::export::{
    DEFAULT_BATCH_LIMIT, DocumentTemplate, ExportError, ExportOptions, ExportReport, Exporter,
    FailurePolicy, ResolveError, RenderError, fetch_batch,
};
use noteport::infra::MimeTable;
use noteport::service::{
    ErrorCode, NoteFetch, NoteFilter, NoteStore, ServiceError, ServiceResult, SnapshotStore,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Note store that serves fixed notes, fails on demand and records calls.
struct FakeStore {
    inner: SnapshotStore,
    failures: HashMap<String, ServiceError>,
    fetched: RefCell<Vec<(String, NoteFetch)>>,
}

impl FakeStore {
    fn new(notes: &[TestNote]) -> Self {
        Self {
            inner: SnapshotStore::from_notes(notes.iter().map(TestNote::to_note).collect()),
            failures: HashMap::new(),
            fetched: RefCell::new(Vec::new()),
        }
    }

    fn failing(mut self, guid: &str, error: ServiceError) -> Self {
        self.failures.insert(guid.to_string(), error);
        self
    }

    fn fetched_guids(&self) -> Vec<String> {
        self.fetched.borrow().iter().map(|(g, _)| g.clone()).collect()
    }
}

impl NoteStore for FakeStore {
    fn list_notes(
        &self,
        filter: &NoteFilter,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Vec<NoteSummary>> {
        self.inner.list_notes(filter, offset, limit)
    }

    fn get_note(&self, guid: &Guid, fetch: &NoteFetch) -> ServiceResult<Note> {
        self.fetched.borrow_mut().push((guid.to_string(), *fetch));
        if let Some(error) = self.failures.get(guid.as_str()) {
            return Err(error.clone());
        }
        self.inner.get_note(guid, fetch)
    }
}

fn auth_expired() -> ServiceError {
    ServiceError::User {
        code: ErrorCode::AuthExpired,
        parameter: Some("authenticationToken".to_string()),
    }
}

fn export_with(
    store: &FakeStore,
    root: &Path,
    policy: FailurePolicy,
) -> Result<ExportReport, ExportError> {
    let lookup = MimeTable::new();
    let template = DocumentTemplate::default();
    let batch = fetch_batch(store, DEFAULT_BATCH_LIMIT)?;
    let options = ExportOptions {
        root: root.to_path_buf(),
        policy,
    };
    Exporter::new(store, &lookup, &template, options).run(&batch)
}

fn export(store: &FakeStore, root: &Path) -> Result<ExportReport, ExportError> {
    export_with(store, root, FailurePolicy::FailFast)
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ===========================================
// Attachment resolution through the pipeline
// ===========================================

#[test]
fn note_without_attachments_gets_only_html() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Plain").body("Just *text*.")]);

    let report = export(&store, out.path()).unwrap();

    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].attachments, 0);
    assert_eq!(
        files_in(&out.path().join("Plain")),
        vec!["Plain-inline.html", "Plain.html"]
    );
    let linked = std::fs::read_to_string(out.path().join("Plain/Plain.html")).unwrap();
    assert!(linked.starts_with("<!DOCTYPE html>"));
    assert!(linked.contains("<em>text</em>"));
}

#[test]
fn note_without_body_still_renders() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Empty")]);

    export(&store, out.path()).unwrap();

    let inline = std::fs::read_to_string(out.path().join("Empty/Empty-inline.html")).unwrap();
    assert!(inline.contains("<title>Empty</title>"));
}

#[test]
fn every_attachment_is_saved_and_linked() {
    let out = TempDir::new().unwrap();
    let note = TestNote::new("Trip")
        .body("![a](attachment:a1)\n\n![b](attachment:b2)\n\n[ticket](attachment:c3)")
        .attachment("a1", "image/png", PNG_BYTES)
        .attachment("b2", "image/png", PNG_BYTES)
        .attachment("c3", "application/pdf", b"%PDF-1.4");
    let store = FakeStore::new(&[note]);

    let report = export(&store, out.path()).unwrap();

    assert_eq!(report.exported[0].attachments, 3);
    assert_eq!(
        files_in(&out.path().join("Trip")),
        vec!["Trip-inline.html", "Trip.html", "a1.png", "b2.png", "c3.pdf"]
    );
    let linked = std::fs::read_to_string(out.path().join("Trip/Trip.html")).unwrap();
    assert!(linked.contains(r#"src="./a1.png""#));
    assert!(linked.contains(r#"src="./b2.png""#));
    assert!(linked.contains(r#"href="./c3.pdf""#));
    assert_eq!(
        std::fs::read(out.path().join("Trip/c3.pdf")).unwrap(),
        b"%PDF-1.4"
    );
}

#[test]
fn unknown_mime_type_aborts_without_partial_output() {
    let out = TempDir::new().unwrap();
    let note = TestNote::new("Odd")
        .attachment("ok", "image/png", PNG_BYTES)
        .attachment("weird", "application/x-never-heard-of-it", b"??");
    let later = TestNote::new("Later").created_hours_after_base(1);
    let store = FakeStore::new(&[note, later]);

    let err = export(&store, out.path()).unwrap_err();

    match err {
        ExportError::Resolve {
            title,
            source: ResolveError::UnknownMimeType { attachment, .. },
            ..
        } => {
            assert_eq!(title, "Odd");
            assert_eq!(attachment.as_str(), "weird");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(files_in(&out.path().join("Odd")).is_empty());
    assert!(!out.path().join("Later").exists());
}

#[test]
fn reference_to_missing_attachment_is_a_render_error() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Dangling").body("![gone](attachment:ghost)")]);

    let err = export(&store, out.path()).unwrap_err();

    assert!(matches!(
        err,
        ExportError::Render {
            source: RenderError::UnresolvedAttachment { .. },
            ..
        }
    ));
}

// ===========================================
// End-to-end scenario
// ===========================================

#[test]
fn groceries_scenario() {
    let out = TempDir::new().unwrap();
    let note = TestNote::new("Groceries")
        .body("- [ ] milk\n- [ ] eggs\n\n![list](attachment:abc123)")
        .attachment("abc123", "image/png", PNG_BYTES);
    let store = FakeStore::new(&[note]);

    let report = export(&store, out.path()).unwrap();

    let dir = out.path().join("Groceries");
    assert!(dir.join("Groceries.html").is_file());
    assert!(dir.join("Groceries-inline.html").is_file());
    assert_eq!(std::fs::read(dir.join("abc123.png")).unwrap(), PNG_BYTES);

    let linked = std::fs::read_to_string(dir.join("Groceries.html")).unwrap();
    let inline = std::fs::read_to_string(dir.join("Groceries-inline.html")).unwrap();
    assert!(linked.contains("./abc123.png"));
    assert!(!inline.contains("./abc123.png"));
    assert!(inline.contains("data:image/png;base64,"));

    assert_eq!(report.exported[0].directory, dir);
    assert_eq!(report.exported[0].linked_html, dir.join("Groceries.html"));
    assert_eq!(report.exported[0].inline_html, dir.join("Groceries-inline.html"));
}

// ===========================================
// Run-level behavior
// ===========================================

#[test]
fn rerun_is_byte_identical() {
    let out = TempDir::new().unwrap();
    let note = TestNote::new("Stable")
        .body("![pic](attachment:p1)")
        .attachment("p1", "image/png", PNG_BYTES);
    let store = FakeStore::new(&[note]);

    export(&store, out.path()).unwrap();
    let dir = out.path().join("Stable");
    let first_linked = std::fs::read(dir.join("Stable.html")).unwrap();
    let first_inline = std::fs::read(dir.join("Stable-inline.html")).unwrap();
    let first_files = files_in(&dir);

    export(&store, out.path()).unwrap();

    assert_eq!(std::fs::read(dir.join("Stable.html")).unwrap(), first_linked);
    assert_eq!(std::fs::read(dir.join("Stable-inline.html")).unwrap(), first_inline);
    assert_eq!(files_in(&dir), first_files);
}

#[test]
fn notes_are_exported_oldest_first() {
    let out = TempDir::new().unwrap();
    let notes = [
        TestNote::new("Middle").guid("m").created_hours_after_base(2),
        TestNote::new("Newest").guid("n").created_hours_after_base(3),
        TestNote::new("Oldest").guid("o").created_hours_after_base(1),
    ];
    let store = FakeStore::new(&notes);

    let report = export(&store, out.path()).unwrap();

    assert_eq!(store.fetched_guids(), vec!["o", "m", "n"]);
    let order: Vec<&str> = report.exported.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(order, vec!["Oldest", "Middle", "Newest"]);
}

#[test]
fn notes_are_fetched_with_content_and_data_only() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Flags")]);

    export(&store, out.path()).unwrap();

    let fetched = store.fetched.borrow();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].1, NoteFetch::EXPORT);
    assert!(fetched[0].1.with_content);
    assert!(fetched[0].1.with_resources_data);
    assert!(!fetched[0].1.with_resources_recognition);
    assert!(!fetched[0].1.with_resources_alternate_data);
}

#[test]
fn batch_is_capped_at_default_limit() {
    let out = TempDir::new().unwrap();
    let notes: Vec<TestNote> = (0..25)
        .map(|i| TestNote::new(format!("Note {i}")).created_hours_after_base(i))
        .collect();
    let store = FakeStore::new(&notes);

    let report = export(&store, out.path()).unwrap();

    assert_eq!(report.exported.len(), 20);
    assert_eq!(report.exported[19].title, "Note 19");
}

#[test]
fn auth_expired_halts_before_later_notes() {
    let out = TempDir::new().unwrap();
    let notes = [
        TestNote::new("One").guid("g1").created_hours_after_base(1),
        TestNote::new("Two").guid("g2").created_hours_after_base(2),
        TestNote::new("Three").guid("g3").created_hours_after_base(3),
    ];
    let store = FakeStore::new(&notes).failing("g2", auth_expired());

    let err = export(&store, out.path()).unwrap_err();

    match &err {
        ExportError::Fetch { guid, source, .. } => {
            assert_eq!(guid.as_str(), "g2");
            assert_eq!(source.to_string(), "authentication token is expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.fetched_guids(), vec!["g1", "g2"]);
    assert!(out.path().join("One/One.html").is_file());
    assert!(!out.path().join("Three").exists());
}

#[test]
fn auth_expired_halts_even_when_isolating() {
    let out = TempDir::new().unwrap();
    let notes = [
        TestNote::new("One").guid("g1").created_hours_after_base(1),
        TestNote::new("Two").guid("g2").created_hours_after_base(2),
    ];
    let store = FakeStore::new(&notes).failing("g1", auth_expired());

    let err = export_with(&store, out.path(), FailurePolicy::Isolate).unwrap_err();

    assert!(err.is_account_wide());
    assert_eq!(store.fetched_guids(), vec!["g1"]);
    assert!(!out.path().join("Two").exists());
}

#[test]
fn isolate_records_note_failures_and_continues() {
    let out = TempDir::new().unwrap();
    let notes = [
        TestNote::new("Gone").guid("g1").created_hours_after_base(1),
        TestNote::new("Odd")
            .guid("g2")
            .created_hours_after_base(2)
            .attachment("x", "application/x-never-heard-of-it", b"?"),
        TestNote::new("Fine").guid("g3").created_hours_after_base(3),
    ];
    let store = FakeStore::new(&notes).failing(
        "g1",
        ServiceError::NotFound {
            identifier: "Note.guid".to_string(),
            key: Some("g1".to_string()),
        },
    );

    let report = export_with(&store, out.path(), FailurePolicy::Isolate).unwrap();

    assert!(!report.is_success());
    let failed: Vec<&str> = report.failed.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(failed, vec!["Gone", "Odd"]);
    assert!(report.failed[0].error.contains("Note.guid not found (g1)"));
    assert!(report.failed[1].error.contains("application/x-never-heard-of-it"));
    assert_eq!(report.exported.len(), 1);
    assert_eq!(report.exported[0].title, "Fine");
    assert!(out.path().join("Fine/Fine.html").is_file());
}

#[test]
fn listing_failure_is_reported() {
    struct DownStore;

    impl NoteStore for DownStore {
        fn list_notes(&self, _: &NoteFilter, _: usize, _: usize) -> ServiceResult<Vec<NoteSummary>> {
            Err(ServiceError::transport("connection refused"))
        }

        fn get_note(&self, _: &Guid, _: &NoteFetch) -> ServiceResult<Note> {
            unreachable!("nothing was listed")
        }
    }

    let err = fetch_batch(&DownStore, DEFAULT_BATCH_LIMIT).unwrap_err();

    assert!(matches!(err, ExportError::List(ServiceError::Transport { .. })));
    assert!(err.is_account_wide());
}

// ===========================================
// Directory naming
// ===========================================

#[test]
fn unsafe_titles_are_sanitized() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Q1/Q2: plan?")]);

    export(&store, out.path()).unwrap();

    assert!(out.path().join("Q1_Q2_ plan_/Q1_Q2_ plan_.html").is_file());
}

#[test]
fn blank_title_falls_back_to_guid() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("   ").guid("blank-1")]);

    export(&store, out.path()).unwrap();

    assert!(out.path().join("blank-1/blank-1-inline.html").is_file());
}

#[test]
fn dotted_title_stays_inside_export_root() {
    let out = TempDir::new().unwrap();
    let root = out.path().join("export");
    let store = FakeStore::new(&[TestNote::new(".. .")
        .guid("dots-1")
        .attachment("pw", "image/png", PNG_BYTES)]);

    let report = export(&store, &root).unwrap();

    assert_eq!(report.exported[0].directory, root.join("dots-1"));
    assert_eq!(files_in(out.path()), vec!["export"]);
    assert_eq!(files_in(&root), vec!["dots-1"]);
    assert_eq!(
        files_in(&root.join("dots-1")),
        vec!["dots-1-inline.html", "dots-1.html", "pw.png"]
    );
}

#[test]
fn attachment_named_like_the_note_html_fails_the_note() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Groceries")
        .guid("g1")
        .body("[page](attachment:Groceries)")
        .attachment("Groceries", "text/html", b"<p>saved page</p>")]);

    let err = export(&store, out.path()).unwrap_err();

    match err {
        ExportError::Resolve {
            source: ResolveError::ReservedName { file_name, .. },
            ..
        } => assert_eq!(file_name, "Groceries.html"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(files_in(&out.path().join("Groceries")).is_empty());
}

#[test]
fn unreferenced_attachments_are_saved_and_reported() {
    let out = TempDir::new().unwrap();
    let store = FakeStore::new(&[TestNote::new("Mixed")
        .body("![shown](attachment:shown)")
        .attachment("shown", "image/png", PNG_BYTES)
        .attachment("extra", "image/png", PNG_BYTES)]);

    let report = export(&store, out.path()).unwrap();

    let exported = &report.exported[0];
    assert_eq!(exported.attachments, 2);
    let unreferenced: Vec<&str> = exported.unreferenced.iter().map(Guid::as_str).collect();
    assert_eq!(unreferenced, vec!["extra"]);
    assert!(out.path().join("Mixed/extra.png").is_file());
}
