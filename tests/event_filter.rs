// tests/event_filter.rs

use std::path::Path;

use notify::event::{CreateKind, DataChange, EventKind, ModifyKind, RemoveKind, RenameMode};
use watchrun::errors::SupervisorError;
use watchrun::types::{FileEvent, FileEventKind};
use watchrun::watch::{classify_kind, EventFilter};

fn filter(exts: &[&str], exclude: &[&str]) -> EventFilter {
    EventFilter::new("/proj", exts, exclude).unwrap()
}

#[test]
fn modified_source_file_qualifies() {
    let f = filter(&["py"], &[]);
    assert!(f.qualifies(&FileEvent::modified("/proj/a.py")));
    assert!(f.qualifies(&FileEvent::modified("/proj/deep/nested/b.py")));
}

#[test]
fn other_extensions_and_kinds_do_not_qualify() {
    let f = filter(&["py"], &[]);
    assert!(!f.qualifies(&FileEvent::modified("/proj/a.txt")));
    assert!(!f.qualifies(&FileEvent::modified("/proj/a.pyc")));
    assert!(!f.qualifies(&FileEvent::modified("/proj/python")));
    assert!(!f.qualifies(&FileEvent::new("/proj/a.py", FileEventKind::Created)));
    assert!(!f.qualifies(&FileEvent::new("/proj/a.py", FileEventKind::Deleted)));
}

#[test]
fn extensions_accept_leading_dot_and_multiple_suffixes() {
    let f = filter(&[".rs", "tar.gz"], &[]);
    assert_eq!(f.extensions(), vec!["rs", "tar.gz"]);
    assert!(f.matches_path(Path::new("/proj/src/main.rs")));
    assert!(f.matches_path(Path::new("/proj/dist/bundle.tar.gz")));
    assert!(!f.matches_path(Path::new("/proj/dist/bundle.gz")));
}

#[test]
fn exclude_globs_are_relative_to_root() {
    let f = filter(&["py"], &["**/__pycache__/**", "build/**"]);
    assert!(f.matches_path(Path::new("/proj/app/main.py")));
    assert!(!f.matches_path(Path::new("/proj/app/__pycache__/main.py")));
    assert!(!f.matches_path(Path::new("/proj/build/gen.py")));
    assert!(!f.qualifies(&FileEvent::modified("/proj/build/gen.py")));
}

#[test]
fn relative_root_excludes_files_that_are_already_gone() {
    let cwd = std::env::current_dir().unwrap();
    let f = EventFilter::new(".", ["py"], ["build/**"]).unwrap();
    assert!(f.root().is_absolute());

    // Never created, so only the root can anchor the relative match.
    let gone = cwd.join("build").join("watchrun-vanished-module.py");
    assert!(!gone.exists());
    assert!(!f.qualifies(&FileEvent::modified(&gone)));
    assert!(f.qualifies(&FileEvent::modified(cwd.join("src").join("vanished.py"))));
}

#[test]
fn blank_extension_is_rejected() {
    let err = EventFilter::new("/proj", &["py", " "], &[] as &[&str]).unwrap_err();
    assert!(matches!(err, SupervisorError::ConfigError(_)));
}

#[test]
fn for_extensions_drops_blank_entries() {
    let f = EventFilter::for_extensions("/proj", ["", "py"]);
    assert_eq!(f.extensions(), vec!["py"]);
    assert!(f.exclude_patterns().is_empty());
}

#[test]
fn notify_kinds_are_classified() {
    assert_eq!(classify_kind(&EventKind::Create(CreateKind::File)), FileEventKind::Created);
    assert_eq!(
        classify_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
        FileEventKind::Modified
    );
    assert_eq!(
        classify_kind(&EventKind::Modify(ModifyKind::Any)),
        FileEventKind::Modified
    );
    assert_eq!(
        classify_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
        FileEventKind::Moved
    );
    assert_eq!(classify_kind(&EventKind::Remove(RemoveKind::File)), FileEventKind::Deleted);
    assert_eq!(classify_kind(&EventKind::Any), FileEventKind::Other);
}
