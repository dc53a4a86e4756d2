use super::*;

#[test]
fn css_url_encodes_family_and_weight() {
    assert_eq!(
        google_css_url("Inter", 900),
        "https://fonts.googleapis.com/css2?family=Inter:wght@900&display=swap"
    );
    assert_eq!(
        google_css_url(" Playfair Display ", 400),
        "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400&display=swap"
    );
}

#[test]
fn extracts_first_font_url() {
    let css = r#"
/* latin */
@font-face {
  font-family: 'Inter';
  font-style: normal;
  font-weight: 900;
  font-display: swap;
  src: url(https://fonts.gstatic.com/s/inter/v13/abc.ttf) format('truetype');
}
@font-face {
  src: url(https://fonts.gstatic.com/s/inter/v13/second.ttf) format('truetype');
}
"#;
    assert_eq!(
        extract_font_url(css),
        Some("https://fonts.gstatic.com/s/inter/v13/abc.ttf")
    );
    assert_eq!(
        extract_font_url("src: url('https://x/y.ttf')"),
        Some("https://x/y.ttf")
    );
    assert_eq!(extract_font_url("src: local(Inter)"), None);
    assert_eq!(extract_font_url("src: url()"), None);
}

#[test]
fn default_policy_retries_with_timeout() {
    let opts = RemoteFontOpts::default();
    assert!(opts.retries > 0);
    assert!(opts.timeout > Duration::ZERO);
}
