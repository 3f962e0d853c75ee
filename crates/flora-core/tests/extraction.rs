use flora_core::TraitPipeline;
use flora_model::{Document, ExtractOptions, FieldValue, TraitKind, TraitRecord};
use flora_terms::TermRegistry;

fn parse(text: &str) -> Document {
    let pipeline = TraitPipeline::new(
        TermRegistry::builtin().expect("builtin terms"),
        ExtractOptions::default(),
    )
    .expect("pipeline");
    pipeline.parse("test", text).expect("parse")
}

fn of_kind(document: &Document, kind: TraitKind) -> Vec<&TraitRecord> {
    document.traits.iter().filter(|r| r.kind == kind).collect()
}

fn summary(document: &Document) -> String {
    document
        .traits
        .iter()
        .map(|record| {
            let fields: Vec<String> = record
                .fields
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            format!(
                "{} {}..{} {}",
                record.name("plant"),
                record.start,
                record.end,
                fields.join(" ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn size_with_two_groups_back_fills_units() {
    let document = parse("Leaf (12-)23-34 × 45-56 cm");
    insta::assert_snapshot!(summary(&document), @r"
    part 0..4 part=leaf
    leaf_size 5..26 length_high=34 length_low=23 length_min=12 length_units=cm part=leaf width_high=56 width_low=45 width_units=cm
    ");
}

#[test]
fn color_groups_are_normalized() {
    let document = parse(
        "hypanthium green or greenish yellow, usually not purple-spotted, \
         rarely purple-spotted distally",
    );
    let colors = of_kind(&document, TraitKind::Color);
    assert_eq!(colors.len(), 1);
    assert_eq!(
        colors[0].get("color"),
        Some(&FieldValue::List(vec![
            "green".to_string(),
            "green-yellow".to_string(),
            "purple-spotted".to_string(),
        ]))
    );
    assert_eq!(colors[0].name("plant"), "hypanthium_color");
}

#[test]
fn suffix_count_is_relabeled() {
    let document = parse("leaf shallowly to deeply 5–7-lobed");
    let counts = of_kind(&document, TraitKind::Count);
    assert_eq!(counts.len(), 1);
    let count = counts[0];
    assert_eq!(count.name("plant"), "leaf_lobe_count");
    assert_eq!(count.get("low"), Some(&FieldValue::Int(5)));
    assert_eq!(count.get("high"), Some(&FieldValue::Int(7)));
    assert_eq!((count.start, count.end), (25, 34));
}

#[test]
fn width_named_first_is_reordered() {
    let document = parse("Leaf blades 3 cm wide × 8 cm long");
    let sizes = of_kind(&document, TraitKind::Size);
    assert_eq!(sizes.len(), 1);
    assert_eq!(sizes[0].get("length_low"), Some(&FieldValue::Float(8.0)));
    assert_eq!(sizes[0].get("width_low"), Some(&FieldValue::Float(3.0)));
    assert_eq!(sizes[0].text("part"), Some("leaf"));
}

#[test]
fn sex_annotations_stay_with_their_sizes() {
    let document = parse("petals (1–)3–10(–12) mm (pistillate) or 5–8(–10) mm (staminate)");
    let sizes = of_kind(&document, TraitKind::Size);
    assert_eq!(sizes.len(), 2);
    assert_eq!((sizes[0].start, sizes[0].end), (7, 36));
    assert_eq!(sizes[0].text("sex"), Some("pistillate"));
    assert_eq!((sizes[1].start, sizes[1].end), (40, 63));
    assert_eq!(sizes[1].text("sex"), Some("staminate"));
    assert!(sizes.iter().all(|s| s.text("part") == Some("petal")));
}

#[test]
fn records_stay_inside_the_text() {
    let text = "Trees to 25 m. Leaves: petiole 2–8 cm; blade ovate, 5–12 × 4–10 cm, \
                margins coarsely serrate. Flowers solitary; petals 5, white or pink.";
    let document = parse(text);
    let len = text.chars().count();
    assert!(!document.traits.is_empty());
    for record in &document.traits {
        assert!(record.start < record.end && record.end <= len, "{record:?}");
    }
    for pair in document.traits.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
}

#[test]
fn not_a_size_suppresses_the_measurement() {
    let document = parse("Seeds dormant for 3 mm");
    assert!(of_kind(&document, TraitKind::Size).is_empty());
}

#[test]
fn to_after_the_cross_keeps_both_dimensions() {
    let document = parse("leaflets obovate, 1-2.5 × to 1.6 cm,");
    let sizes = of_kind(&document, TraitKind::Size);
    assert_eq!(sizes.len(), 1);
    let size = sizes[0];
    assert_eq!((size.start, size.end), (18, 35));
    assert_eq!(size.name("plant"), "leaflet_size");
    assert_eq!(size.get("length_low"), Some(&FieldValue::Float(1.0)));
    assert_eq!(size.get("length_high"), Some(&FieldValue::Float(2.5)));
    assert_eq!(size.get("width_low"), Some(&FieldValue::Float(1.6)));
    assert_eq!(size.text("width_units"), Some("cm"));
    assert!(!size.has("width_high"));
}

#[test]
fn sex_before_a_part_governs_its_clause() {
    let document =
        parse("Plants dioecious; staminate flowers: petals 3 mm; pistillate flowers: petals 5 mm.");
    let sizes = of_kind(&document, TraitKind::Size);
    assert_eq!(sizes.len(), 2);
    assert_eq!(sizes[0].get("length_low"), Some(&FieldValue::Float(3.0)));
    assert_eq!(sizes[0].text("sex"), Some("staminate"));
    assert_eq!(sizes[1].get("length_low"), Some(&FieldValue::Float(5.0)));
    assert_eq!(sizes[1].text("sex"), Some("pistillate"));
    assert!(sizes.iter().all(|s| s.text("part") == Some("petal")));
}

#[test]
fn malformed_number_gives_no_measurement() {
    let document = parse("Fruit 1.2.3 mm");
    assert!(of_kind(&document, TraitKind::Size).is_empty());
    assert_eq!(of_kind(&document, TraitKind::Part).len(), 1);
}

#[test]
fn units_glued_to_the_number_are_a_size() {
    let document = parse("Petals 5mm.");
    let sizes = of_kind(&document, TraitKind::Size);
    assert_eq!(sizes.len(), 1);
    assert_eq!((sizes[0].start, sizes[0].end), (7, 10));
    assert_eq!(sizes[0].get("length_low"), Some(&FieldValue::Float(5.0)));
    assert_eq!(sizes[0].text("length_units"), Some("mm"));
}

#[test]
fn several_is_a_count() {
    let document = parse("Flowers several");
    let counts = of_kind(&document, TraitKind::Count);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].name("plant"), "flower_count");
    assert_eq!(counts[0].get("low"), Some(&FieldValue::Int(3)));
    assert_eq!(counts[0].get("indefinite"), Some(&FieldValue::Flag(true)));
}

#[test]
fn fractions_are_not_counts() {
    let document = parse("leaf sinuses 1/5–1/4 to base");
    assert!(of_kind(&document, TraitKind::Count).is_empty());
}
