//! Treatment discovery and option files.

use std::fs;
use std::path::PathBuf;

use flora_cli::config::load_options;
use flora_cli::input::{discover_inputs, load_treatment};

#[test]
fn directories_expand_to_sorted_treatment_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("b_species.html"), "<p>Leaves red.</p>").expect("write");
    fs::write(dir.path().join("a_species.txt"), "Leaves green.").expect("write");
    fs::write(dir.path().join("notes.md"), "ignored").expect("write");
    fs::create_dir(dir.path().join("nested")).expect("mkdir");

    let files = discover_inputs(&[dir.path().to_path_buf()]).expect("discover");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_species.txt", "b_species.html"]);
}

#[test]
fn explicit_files_are_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("treatment.md");
    fs::write(&path, "Petals 5.").expect("write");
    assert_eq!(discover_inputs(std::slice::from_ref(&path)).expect("discover"), vec![path]);
}

#[test]
fn missing_input_is_an_error() {
    let error = discover_inputs(&[PathBuf::from("/nonexistent/flora/input")]).unwrap_err();
    assert!(error.to_string().contains("input not found"));
}

#[test]
fn html_treatments_are_reduced_to_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Acer_rubrum.html");
    fs::write(&path, "<div>Trees.</div><div>Leaves <i>3-lobed</i>.</div>").expect("write");
    let treatment = load_treatment(&path).expect("load");
    assert_eq!(treatment.id, "Acer_rubrum");
    assert_eq!(treatment.taxon(), "Acer rubrum");
    assert_eq!(treatment.text, "Trees.\n\nLeaves 3-lobed.");
}

#[test]
fn option_file_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flora.toml");
    fs::write(&path, "genus_filters = [\"Acer\"]\nhighlight_parts = false\n").expect("write");
    let options = load_options(Some(&path)).expect("options");
    assert_eq!(options.genus_filters, vec!["Acer".to_string()]);
    assert!(!options.highlight_parts);
    assert!(options.select_treatment);
}

#[test]
fn bad_option_file_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flora.toml");
    fs::write(&path, "default_part = 3\n").expect("write");
    let error = load_options(Some(&path)).unwrap_err();
    assert!(format!("{error:#}").contains("flora.toml"));
}
