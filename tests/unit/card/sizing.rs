use crate::card::config::TitleScale;

#[test]
fn short_titles_use_the_large_tier() {
    let scale = TitleScale::default();
    for len in 0..=25 {
        assert_eq!(scale.font_size_for_len(len), 110.0, "len {len}");
    }
}

#[test]
fn tier_boundaries_are_inclusive() {
    let scale = TitleScale::default();
    assert_eq!(scale.font_size_for_len(26), 92.0);
    assert_eq!(scale.font_size_for_len(27), 92.0);
    assert_eq!(scale.font_size_for_len(40), 92.0);
    assert_eq!(scale.font_size_for_len(41), 80.0);
    assert_eq!(scale.font_size_for_len(60), 80.0);
    assert_eq!(scale.font_size_for_len(61), 72.0);
    assert_eq!(scale.font_size_for_len(80), 72.0);
    assert_eq!(scale.font_size_for_len(81), 64.0);
    assert_eq!(scale.font_size_for_len(100), 64.0);
}

#[test]
fn long_titles_hit_the_floor() {
    let scale = TitleScale::default();
    for len in [101, 150, 10_000, usize::MAX] {
        assert_eq!(scale.font_size_for_len(len), 56.0);
    }
}

#[test]
fn size_is_monotonic_non_increasing() {
    let scale = TitleScale::default();
    let mut prev = f32::INFINITY;
    for len in 0..400 {
        let size = scale.font_size_for_len(len);
        assert!(size <= prev, "size grew at len {len}");
        prev = size;
    }
}

#[test]
fn title_length_counts_characters_not_bytes() {
    let scale = TitleScale::default();
    // 25 characters, 50 bytes.
    let title = "ééééééééééééééééééééééééé";
    assert_eq!(title.chars().count(), 25);
    assert_eq!(scale.font_size_for(title), 110.0);
    assert_eq!(scale.font_size_for("Why I Keep Starting Blogs"), 110.0);
    assert_eq!(scale.font_size_for("Why I Keep Starting Blogs!!"), 92.0);
}

#[test]
fn line_height_tightens_as_size_grows() {
    let scale = TitleScale::default();
    assert_eq!(scale.line_height_for(110.0), 1.3);
    assert_eq!(scale.line_height_for(80.0), 1.3);
    assert_eq!(scale.line_height_for(72.0), 1.4);
    assert_eq!(scale.line_height_for(64.0), 1.4);
    assert_eq!(scale.line_height_for(56.0), 1.45);
    assert_eq!(scale.line_height_for(40.0), 1.5);

    let mut prev = 0.0f32;
    for len in 0..200 {
        let lh = scale.line_height_for(scale.font_size_for_len(len));
        assert!(lh >= prev);
        prev = lh;
    }
}
