//! Integration tests for the request fingerprinting engine.
//!
//! Everything here is pure computation; no network access is required.

use serde_json::{json, Map, Value};

use remora::{
    Config, Digest, FallbackFingerprinter, Fingerprinter, Request, UrlFingerprinter, DIGEST_LEN,
    META_RENDER, META_RENDER_AUTOMAP,
};

fn fingerprinter() -> Fingerprinter {
    Fingerprinter::new(&Config::default())
}

fn transparent_fingerprinter() -> Fingerprinter {
    Fingerprinter::new(&Config {
        transparent_mode: true,
        ..Config::default()
    })
}

/// Merge JSON objects left to right.
fn merge(maps: &[Value]) -> Value {
    let mut merged = Map::new();
    for map in maps {
        if let Value::Object(map) = map {
            for (key, value) in map {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(merged)
}

#[test]
fn determinism() {
    let fingerprinter = fingerprinter();
    let request = Request::new("https://example.com").with_meta(META_RENDER, true);
    let first = fingerprinter.fingerprint(&request).unwrap();
    let second = fingerprinter.fingerprint(&request).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.as_bytes().len(), DIGEST_LEN);

    // A second engine with the same configuration agrees.
    let other = Fingerprinter::new(&Config::default());
    assert_eq!(other.fingerprint(&request).unwrap(), first);
}

#[test]
fn fallback_custom() {
    struct CustomFingerprinter;
    impl FallbackFingerprinter for CustomFingerprinter {
        fn fingerprint(&self, _request: &Request) -> Digest {
            Digest::from([0xab; DIGEST_LEN])
        }
    }

    let fingerprinter =
        Fingerprinter::with_fallback(&Config::default(), Box::new(CustomFingerprinter));
    let request = Request::new("https://example.com");
    assert_eq!(
        fingerprinter.fingerprint(&request).unwrap(),
        Digest::from([0xab; DIGEST_LEN])
    );
    let request = Request::new("https://example.com").with_meta(META_RENDER, true);
    assert_ne!(
        fingerprinter.fingerprint(&request).unwrap(),
        Digest::from([0xab; DIGEST_LEN])
    );
}

#[test]
fn fallback_default() {
    let fingerprinter = fingerprinter();
    let fallback = UrlFingerprinter;

    let request = Request::new("https://example.com");
    let new_fingerprint = fingerprinter.fingerprint(&request).unwrap();
    let old_fingerprint = fallback.fingerprint(&request);
    assert_eq!(new_fingerprint, old_fingerprint);

    let request = Request::new("https://example.com").with_meta(META_RENDER_AUTOMAP, true);
    let new_fingerprint = fingerprinter.fingerprint(&request).unwrap();
    assert_eq!(old_fingerprint, fallback.fingerprint(&request));
    assert_ne!(new_fingerprint, old_fingerprint);
}

#[test]
fn header_parameters_are_metadata() {
    let fingerprinter = fingerprinter();
    let request1 = Request::new("https://example.com").with_meta(
        META_RENDER,
        json!({
            "httpResponseBody": true,
            "httpResponseHeaders": true,
            "customHttpRequestHeaders": [{"name": "foo", "value": "bar"}],
            "requestHeaders": {"referer": "baz"},
        }),
    );
    let request2 = Request::new("https://example.com").with_meta(META_RENDER, true);
    assert_eq!(
        fingerprinter.fingerprint(&request1).unwrap(),
        fingerprinter.fingerprint(&request2).unwrap()
    );
}

#[test]
fn echo_and_job_parameters_are_metadata() {
    let fingerprinter = fingerprinter();
    let request1 = Request::new("https://example.com").with_meta(
        META_RENDER,
        json!({
            "httpResponseBody": true,
            "httpResponseHeaders": true,
            "echoData": "foo",
            "jobId": "1/2/3",
        }),
    );
    let request2 = Request::new("https://example.com").with_meta(META_RENDER, true);
    assert_eq!(
        fingerprinter.fingerprint(&request1).unwrap(),
        fingerprinter.fingerprint(&request2).unwrap()
    );
}

#[test]
fn unknown_parameters_are_metadata() {
    let fingerprinter = fingerprinter();
    let request1 = Request::new("https://example.com").with_meta(
        META_RENDER,
        json!({"httpResponseBody": true, "httpResponseHeaders": true, "unknown": "x"}),
    );
    let request2 = Request::new("https://example.com").with_meta(META_RENDER, true);
    assert_eq!(
        fingerprinter.fingerprint(&request1).unwrap(),
        fingerprinter.fingerprint(&request2).unwrap()
    );
}

/// However a request comes to use some render-API parameters, the
/// fingerprint is the same if the parameters actually sent are the same.
#[test]
fn only_end_parameters_matter() {
    let transparent = transparent_fingerprinter();
    let default = fingerprinter();

    let request = Request::new("https://example.com");
    let fingerprint1 = transparent.fingerprint(&request).unwrap();
    let fingerprint2 = default.fingerprint(&request).unwrap();

    let raw_request = Request::new("https://example.com").with_meta(
        META_RENDER,
        json!({"httpResponseBody": true, "httpResponseHeaders": true}),
    );
    let fingerprint3 = transparent.fingerprint(&raw_request).unwrap();
    let fingerprint4 = default.fingerprint(&raw_request).unwrap();

    let auto_request = Request::new("https://example.com").with_meta(META_RENDER_AUTOMAP, true);
    let fingerprint5 = transparent.fingerprint(&auto_request).unwrap();
    let fingerprint6 = default.fingerprint(&auto_request).unwrap();

    assert_ne!(fingerprint1, fingerprint2);

    assert_eq!(fingerprint3, fingerprint4);
    assert_eq!(fingerprint5, fingerprint6);

    assert_eq!(fingerprint1, fingerprint3);
    assert_eq!(fingerprint1, fingerprint5);
}

#[test]
fn url_canonicalization() {
    let cases: &[(&str, &str, bool)] = &[
        ("https://example.com", "https://example.com", true),
        ("https://example.com", "https://example.com/", true),
        ("https://example.com/a", "https://example.com/b", false),
        ("https://example.com/?1", "https://example.com/?2", false),
        ("https://example.com/?a=1", "https://example.com/?a=2", false),
        ("https://example.com/?a=1&b=2", "https://example.com/?b=2&a=1", true),
        ("https://example.com?a", "https://example.com?a=", false),
        ("https://example.com", "https://example.com#", true),
        ("https://example.com#", "https://example.com#1", true),
        ("https://example.com#1", "https://example.com#2", true),
    ];
    let fingerprinter = fingerprinter();
    for (url1, url2, should_match) in cases {
        let request1 = Request::new(*url1).with_meta(META_RENDER_AUTOMAP, true);
        let request2 = Request::new(*url2).with_meta(META_RENDER_AUTOMAP, true);
        let fingerprint1 = fingerprinter.fingerprint(&request1).unwrap();
        let fingerprint2 = fingerprinter.fingerprint(&request2).unwrap();
        if *should_match {
            assert_eq!(fingerprint1, fingerprint2, "{url1} vs {url2}");
        } else {
            assert_ne!(fingerprint1, fingerprint2, "{url1} vs {url2}");
        }
    }
}

/// As long as browserHtml or screenshot are enabled, different fragments
/// make for different fingerprints, regardless of other parameters; when
/// neither is enabled, fragments are invisible.
#[test]
fn url_fragments() {
    let body_options = [
        json!({}),
        json!({"httpResponseBody": false}),
        json!({"httpResponseBody": true}),
    ];
    let unknown_options = [json!({}), json!({"unknown": false}), json!({"unknown": true})];
    let browser_on = [
        json!({"browserHtml": true}),
        json!({"screenshot": true}),
        json!({"browserHtml": true, "screenshot": false}),
        json!({"browserHtml": false, "screenshot": true}),
        json!({"browserHtml": true, "screenshot": true}),
    ];
    let browser_off = [
        json!({}),
        json!({"browserHtml": false}),
        json!({"screenshot": false}),
        json!({"browserHtml": false, "screenshot": false}),
    ];

    let fingerprinter = fingerprinter();
    let check = |browser: &Value, body: &Value, unknown: &Value, should_match: bool| {
        let params = merge(&[body.clone(), unknown.clone(), browser.clone()]);
        let request1 =
            Request::new("https://toscrape.com#1").with_meta(META_RENDER, params.clone());
        let request2 = Request::new("https://toscrape.com#2").with_meta(META_RENDER, params.clone());
        let fingerprint1 = fingerprinter.fingerprint(&request1).unwrap();
        let fingerprint2 = fingerprinter.fingerprint(&request2).unwrap();
        if should_match {
            assert_eq!(fingerprint1, fingerprint2, "params: {params}");
        } else {
            assert_ne!(fingerprint1, fingerprint2, "params: {params}");
        }
    };

    for browser in &browser_on {
        for body in &body_options {
            for unknown in &unknown_options {
                check(browser, body, unknown, false);
            }
        }
    }
    for browser in &browser_off {
        for body in &body_options {
            for unknown in &unknown_options {
                check(browser, body, unknown, true);
            }
        }
    }
}

#[test]
fn disabled_flags_equal_absent() {
    let fingerprinter = fingerprinter();
    let request1 = Request::new("https://example.com").with_meta(
        META_RENDER,
        json!({"httpResponseBody": true, "browserHtml": false}),
    );
    let request2 =
        Request::new("https://example.com").with_meta(META_RENDER, json!({"httpResponseBody": true}));
    assert_eq!(
        fingerprinter.fingerprint(&request1).unwrap(),
        fingerprinter.fingerprint(&request2).unwrap()
    );
}

/// Intent that resolves to no content-affecting parameters is
/// indistinguishable from never declaring intent.
#[test]
fn empty_relevant_subset_equals_no_intent() {
    let fingerprinter = fingerprinter();
    let no_intent = Request::new("https://example.com");
    let metadata_only = Request::new("https://example.com")
        .with_meta(META_RENDER, json!({"echoData": "foo"}));
    let disabled_only = Request::new("https://example.com")
        .with_meta(META_RENDER, json!({"httpResponseBody": false}));
    let expected = UrlFingerprinter.fingerprint(&no_intent);
    assert_eq!(fingerprinter.fingerprint(&no_intent).unwrap(), expected);
    assert_eq!(fingerprinter.fingerprint(&metadata_only).unwrap(), expected);
    assert_eq!(fingerprinter.fingerprint(&disabled_only).unwrap(), expected);
}

#[test]
fn distinct_parameter_sets_get_distinct_tokens() {
    let fingerprinter = fingerprinter();
    let empty = fingerprinter
        .fingerprint(&Request::new("https://example.com"))
        .unwrap();
    let body = fingerprinter
        .fingerprint(
            &Request::new("https://example.com").with_meta(META_RENDER, json!({"httpResponseBody": true})),
        )
        .unwrap();
    assert_ne!(empty, body);

    let distinct_params = [
        json!({"httpRequestBody": "Zm9v"}),
        json!({"httpRequestMethod": "POST"}),
        json!({"httpResponseBody": true}),
        json!({"httpResponseHeaders": true}),
        json!({"browserHtml": true}),
        json!({"screenshot": true}),
        json!({"screenshotOptions": {"format": "png"}}),
        json!({"geolocation": "US"}),
        json!({"actions": [{"action": "click", "selector": ".button"}]}),
    ];
    let mut tokens = Vec::new();
    for params in &distinct_params {
        let request = Request::new("https://example.com").with_meta(META_RENDER, params.clone());
        tokens.push(fingerprinter.fingerprint(&request).unwrap());
    }
    for (i, a) in tokens.iter().enumerate() {
        assert_ne!(*a, empty, "params: {}", distinct_params[i]);
        for (j, b) in tokens.iter().enumerate() {
            if i != j {
                assert_ne!(a, b, "{} vs {}", distinct_params[i], distinct_params[j]);
            }
        }
    }
}
