//! End-to-end extraction over the HTML fixtures
use std::sync::Arc;

use rovat_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

fn extractor() -> Extractor {
    Extractor::new(ExtractorConfig::default()).unwrap()
}

fn texts(article: &Article) -> Vec<&str> {
    article.paragraphs.iter().map(|p| p.text.as_str()).collect()
}

#[test]
fn test_reader_mode_merges_fragments_and_drops_ads() {
    let html = read_fixture("article_with_ad.html");
    let article = extractor().extract_html("https://pelda.hu/gazdasag/alapkamat", &html);

    assert_eq!(article.title, "A jegybank változatlanul hagyta az alapkamatot");
    assert_eq!(
        texts(&article),
        vec![
            "A Magyar Nemzeti Bank monetáris tanácsa kedden úgy döntött, hogy az alapkamatot változatlanul 6,5 \
             százalékon tartja a következő hónapokban is.",
            "A döntés főbb pontjai:",
            "• Az alapkamat 6,5 százalékon marad",
            "• A betéti rátát 5,5 százalékra emelték",
        ]
    );
    assert!(texts(&article).iter().all(|t| !t.contains("Hirdetés")));
    assert!(!article.paragraphs[0].is_list_item);
    assert!(article.paragraphs[2].is_list_item);
    assert!(article.paragraphs[3].is_list_item);
}

#[test]
fn test_lead_of_fixture_article() {
    let html = read_fixture("article_with_ad.html");
    let article = extractor().extract_html("https://pelda.hu/gazdasag/alapkamat", &html);

    assert_eq!(article.lead(220), article.paragraphs[0].text);
}

#[test]
fn test_generic_fallback_on_table_layout() {
    let html = read_fixture("table_layout.html");
    let article = extractor().extract_html("https://helyi.pelda.hu/kozlekedes/busz", &html);

    assert_eq!(article.title, "Sűrűbben járnak a belvárosi buszok");
    assert_eq!(
        texts(&article),
        vec![
            "Az önkormányzat szerdán döntött a belvárosi buszjáratok sűrítéséről.",
            "A közlekedési bizottság szerint a reggeli csúcsidőben tízpercenként indulnak majd a járatok.",
            "- Új megálló a főtéren",
        ]
    );
    assert!(article.paragraphs[2].is_list_item);
    assert_eq!(article.paragraphs[2].body(), "Új megálló a főtéren");
}

#[test]
fn test_bundled_domain_rule_for_vg() {
    let html = read_fixture("vg_domain_rule.html");
    let article = extractor().extract_html("https://www.vg.hu/gazdasag/2024/01/benzin", &html);

    assert_eq!(article.title, "Tovább drágul a benzin");
    assert_eq!(
        texts(&article),
        vec![
            "Tovább drágult az üzemanyag, a benzin literenkénti ára ismét emelkedett csütörtökön.",
            "A nagykereskedelmi árak emelkedése miatt péntektől ismét változnak a kútárak az országban.",
            "A gázolaj ára változatlan marad, a benzin viszont bruttó tizenkét forinttal drágul literenként.",
        ]
    );
    assert_eq!(article.source_host(), "www.vg.hu");
}

#[test]
fn test_domain_rule_only_applies_to_its_host() {
    let html = read_fixture("vg_domain_rule.html");
    let article = extractor().extract_html("https://hirek.pelda.hu/benzin", &html);

    // No rule: the lead meta is not prepended.
    assert!(texts(&article).iter().any(|t| t.contains("A gázolaj ára")));
    assert!(!texts(&article).iter().any(|t| t.starts_with("Tovább drágult")));
}

#[test]
fn test_custom_site_rule_directory() {
    let rules = ConfigLoaderBuilder::new().custom_dir(get_fixture_path("sites")).build().load().unwrap();
    assert!(rules.for_host("www.pelda.hu").is_some());
    assert!(rules.for_host("vg.hu").is_some());

    let html = r#"<html><head><title>Hírek</title></head><body>
        <h1 class="cim">Új kerékpárút épül a Duna-parton</h1>
        <div class="bevezeto">A főváros tavasszal kezdi el a rakparti kerékpárút építését.</div>
        <div class="torzs">
            <div>A beruházás várhatóan két évig tart, a forgalmat közben a parton terelik.</div>
            <div class="ajanlo-doboz">Ezek a legszebb kerékpárutak az országban, érdemes kipróbálni mindet.</div>
            <div>A kivitelezőt a nyár végén választják ki nyílt közbeszerzési eljárásban.</div>
        </div>
    </body></html>"#;

    let article = extractor().with_site_rules(Arc::new(rules)).extract_html("https://www.pelda.hu/varos/1", html);

    assert_eq!(article.title, "Új kerékpárút épül a Duna-parton");
    assert_eq!(
        texts(&article),
        vec![
            "A főváros tavasszal kezdi el a rakparti kerékpárút építését.",
            "A beruházás várhatóan két évig tart, a forgalmat közben a parton terelik.",
            "A kivitelezőt a nyár végén választják ki nyílt közbeszerzési eljárásban.",
        ]
    );
}

#[test]
fn test_missing_custom_dir_is_an_error() {
    let result = ConfigLoaderBuilder::new().custom_dir(get_fixture_path("nincs_ilyen")).build().load();
    assert!(matches!(result, Err(RovatError::FileNotFound(_))));
}

#[test]
fn test_custom_junk_patterns() {
    let html = read_fixture("article_with_ad.html");
    let junk = JunkClassifier::new([r"^\s*a döntés"]).unwrap();
    let article = extractor().with_junk(Arc::new(junk)).extract_html("https://pelda.hu/1", &html);

    // The ad line survives without the bundled list; the subheading does not.
    assert!(texts(&article)[0].starts_with("Hirdetés"));
    assert!(!texts(&article).contains(&"A döntés főbb pontjai:"));
}

#[test]
fn test_reflow_output_properties() {
    let fragments = vec![
        RawFragment::paragraph("   "),
        RawFragment::paragraph("Rövid"),
        RawFragment::paragraph("Olvasta már? A legfrissebb hírek egy helyen, kattintson ide"),
        RawFragment::paragraph("A kormány szerdán elfogadta a jövő évi költségvetés tervezetét,"),
        RawFragment::paragraph("amelyet a parlament várhatóan ősszel tárgyal."),
        RawFragment::paragraph("Részletek:"),
        RawFragment::list_item("Hiány: 2,9 százalék"),
        RawFragment::list_item("   "),
        RawFragment::paragraph("Egy befejezetlen, de elég hosszú mondat a cikk legvégén, amely nem zárul le"),
    ];

    let out = reflow(fragments, JunkClassifier::bundled(), &ReflowConfig::default());
    let texts: Vec<&str> = out.iter().map(|p| p.text.as_str()).collect();

    assert_eq!(
        texts,
        vec![
            "A kormány szerdán elfogadta a jövő évi költségvetés tervezetét, amelyet a parlament várhatóan ősszel tárgyal.",
            "Részletek:",
            "• Hiány: 2,9 százalék",
            "Egy befejezetlen, de elég hosszú mondat a cikk legvégén, amely nem zárul le",
        ]
    );
    for paragraph in &out {
        assert!(!paragraph.text.is_empty());
        assert!(!JunkClassifier::bundled().is_junk(&paragraph.text));
        assert_eq!(paragraph.text, normalize(&paragraph.text));
    }
}

#[test]
fn test_digest_from_fixtures() {
    let ex = extractor();
    let articles = vec![
        ex.extract_html("https://pelda.hu/1", &read_fixture("article_with_ad.html")),
        ex.extract_html("https://pelda.hu/2", "<html><body></body></html>"),
    ];
    let digest = Digest::new("Gazdaság", "2024. 2. hét", articles, ex.config().lead_cap);

    assert_eq!(digest.empty_articles(), 1);
    assert_eq!(digest.entries[1].display_title, UNTITLED);

    let md = convert_to_markdown(&digest, &MarkdownConfig::default()).unwrap();
    assert!(md.contains("**1. A jegybank változatlanul hagyta az alapkamatot**"));
    assert!(md.contains("[read article >>>](#cikk_1)"));

    let json: serde_json::Value =
        serde_json::from_str(&convert_to_json(&digest, &JsonConfig::default()).unwrap()).unwrap();
    assert_eq!(json["entries"][0]["article"]["paragraphs"].as_array().unwrap().len(), 4);
}
