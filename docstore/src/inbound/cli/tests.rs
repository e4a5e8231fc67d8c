//! Tests for argument parsing and command output.

use camino::Utf8PathBuf;
use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::domain::StoreConfig;

struct Workspace {
    _temp: TempDir,
    root: Utf8PathBuf,
    store: DocumentStore,
}

impl Workspace {
    fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("docstore").chain(args.iter().copied()))
            .expect("arguments parse");
        let mut out = Vec::new();
        run(&self.store, cli.command, &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    fn touch(&self, relative: &str) {
        std::fs::write(self.root.join(relative), b"content").expect("write fixture file");
    }
}

#[fixture]
fn workspace() -> Workspace {
    let temp = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().join("docs")).expect("utf-8 temp path");
    let store = DocumentStore::open(StoreConfig::new(&root));
    store.init().expect("create zones");
    Workspace {
        _temp: temp,
        root,
        store,
    }
}

#[rstest]
fn global_flags_parse_after_the_subcommand() {
    let cli = Cli::try_parse_from(["docstore", "refresh", "--all", "--root", "/srv/qms", "--log-json"])
        .expect("arguments parse");
    assert_eq!(cli.root, Some(Utf8PathBuf::from("/srv/qms")));
    assert!(cli.log_json);
    assert!(matches!(cli.command, Command::Refresh { all: true, category: None }));
}

#[rstest]
fn refresh_rejects_category_with_all() {
    let parsed = Cli::try_parse_from(["docstore", "refresh", "--all", "--category", "Процедуры"]);
    assert!(parsed.is_err());
}

#[rstest]
fn publish_collects_repeated_archive_flags() {
    let cli = Cli::try_parse_from([
        "docstore", "publish", "--draft", "d.docx", "--type", "ПП", "--code", "К2", "--version",
        "02", "--year", "2024", "--title", "Итог", "--archive", "a.docx", "--archive", "b.docx",
    ])
    .expect("arguments parse");
    let Command::Publish(args) = cli.command else {
        panic!("expected publish");
    };
    assert_eq!(args.archive, ["a.docx", "b.docx"]);
    assert_eq!(args.identity().year, 2024);
}

#[rstest]
fn list_filters_by_type(workspace: Workspace) {
    workspace.touch("ДЕЙСТВУЮЩИЕ/ПП.К2-01-2022 Итог.docx");
    workspace.touch("ДЕЙСТВУЮЩИЕ/ДИ.К3-01-2022 Инструкция.pdf");
    workspace.touch("ДЕЙСТВУЮЩИЕ/readme.txt");

    let output = workspace
        .run(&["list", "active", "--type", "ДИ"])
        .expect("list succeeds");

    assert_eq!(output, "ДИ.К3-01-2022 Инструкция.pdf\n1 document(s)\n");
}

#[rstest]
fn publish_then_read_registry(workspace: Workspace) {
    workspace.touch("ПРОЕКТЫ/черновик.docx");
    workspace.touch("ДЕЙСТВУЮЩИЕ/ПП.К2-01-2022 Итог.docx");

    let output = workspace
        .run(&[
            "publish", "--draft", "черновик.docx", "--type", "ПП", "--code", "К2", "--version",
            "02", "--year", "2024", "--title", "Итог", "--archive", "ПП.К2-01-2022 Итог.docx",
        ])
        .expect("publish succeeds");
    assert!(output.ends_with("stage: snapshot taken\n"), "{output}");
    assert!(workspace.root.join("АРХИВ/ПП.К2-01-2022 Итог.docx").is_file());

    let entries = workspace
        .run(&["registry", "--entries"])
        .expect("registry readable");
    let parsed: serde_json::Value = serde_json::from_str(&entries).expect("valid json");
    assert_eq!(
        parsed.pointer("/0/name").and_then(serde_json::Value::as_str),
        Some("ПП.К2-02-2024 Итог")
    );
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[rstest]
fn registry_before_first_snapshot(workspace: Workspace) {
    let output = workspace.run(&["registry"]).expect("registry readable");
    assert_eq!(output, "no registry snapshot for all yet\n");
}

#[rstest]
fn similar_reports_field_breakdown(workspace: Workspace) {
    workspace.touch("ПРОЕКТЫ/ПП.К2-02-2024 Итог.docx");
    workspace.touch("ДЕЙСТВУЮЩИЕ/ПП.К2-01-2022 Итог.docx");

    let output = workspace
        .run(&["similar", "ПП.К2-02-2024 Итог.docx"])
        .expect("similar succeeds");

    assert_eq!(
        output,
        "ПП.К2-01-2022 Итог.docx\n  same: ТИП(ПП), КОД(К2), НАЗВАНИЕ(Итог)\n  differs: ВЕРСИЯ(02≠01), ГОД(2024≠2022)\n"
    );
}

#[rstest]
fn unknown_category_surfaces_as_store_error(workspace: Workspace) {
    let error = workspace
        .run(&["refresh", "--category", "Процедуры"])
        .expect_err("flat store has no categories");
    assert!(matches!(error, CliError::Store(StoreError::NotFound { .. })));
}
