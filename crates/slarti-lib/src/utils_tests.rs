use super::utils::*;

#[test]
fn edit_distance_basics() {
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("test", "test"), 0);
    assert_eq!(edit_distance("test", "tset"), 2);
    assert_eq!(edit_distance("Colour", "Color"), 1);
}

#[test]
fn find_similar_prefers_closest() {
    let names = ["Theme", "Them", "Colour"];

    assert_eq!(find_similar("Thme", names, 2), Some("Theme"));
    assert_eq!(find_similar("Colr", names, 2), Some("Colour"));
    assert_eq!(find_similar("Unrelated", names, 2), None);
}

#[test]
fn find_similar_skips_exact_name() {
    assert_eq!(find_similar("T", ["T"], 1), None);
}

#[test]
fn suggestion_distance_is_bounded() {
    assert_eq!(max_suggestion_distance("T"), 1);
    assert_eq!(max_suggestion_distance("Colour"), 2);
    assert_eq!(max_suggestion_distance("VeryLongPrincipleName"), 3);
}
