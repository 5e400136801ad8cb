#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{derive_slug, validate_slug};

        #[test]
        fn test_derive_slug_basic() {
            assert_eq!(derive_slug("Hello World"), "hello-world");
        }

        #[test]
        fn test_derive_slug_special_characters() {
            assert_eq!(derive_slug("Hello, World!"), "hello-world");
        }

        #[test]
        fn test_derive_slug_accents() {
            assert_eq!(derive_slug("Café au lait"), "cafe-au-lait");
            assert_eq!(derive_slug("Él Amanecer de la IA"), "el-amanecer-de-la-ia");
        }

        #[test]
        fn test_derive_slug_numbers() {
            assert_eq!(derive_slug("Article 123"), "article-123");
        }

        #[test]
        fn test_derive_slug_collapses_runs() {
            assert_eq!(derive_slug("Hello   World"), "hello-world");
            assert_eq!(derive_slug("A   B--C"), "a-b-c");
            assert_eq!(derive_slug("one - two"), "one-two");
        }

        #[test]
        fn test_derive_slug_no_edge_hyphens() {
            assert_eq!(derive_slug("  Hello World  "), "hello-world");
            assert_eq!(derive_slug("-leading and trailing-"), "leading-and-trailing");
            assert_eq!(derive_slug("!!! Wow !!!"), "wow");
        }

        #[test]
        fn test_derive_slug_empty_input() {
            assert_eq!(derive_slug(""), "");
            assert_eq!(derive_slug("   "), "");
            assert_eq!(derive_slug("!!!"), "");
        }

        #[test]
        fn test_derive_slug_idempotent() {
            for title in ["Hello World", "Café au lait", "A   B--C", "Article 123"] {
                let once = derive_slug(title);
                assert_eq!(derive_slug(&once), once);
            }
        }

        #[test]
        fn test_validate_slug_valid() {
            assert!(validate_slug("hello-world"));
            assert!(validate_slug("my-blog-post-2024"));
            assert!(validate_slug("a"));
            assert!(validate_slug("123"));
        }

        #[test]
        fn test_validate_slug_invalid_empty() {
            assert!(!validate_slug(""));
        }

        #[test]
        fn test_validate_slug_invalid_uppercase() {
            assert!(!validate_slug("Hello-World"));
        }

        #[test]
        fn test_validate_slug_invalid_special_chars() {
            assert!(!validate_slug("hello_world"));
            assert!(!validate_slug("hello world"));
            assert!(!validate_slug("hello!world"));
        }

        #[test]
        fn test_validate_slug_invalid_hyphen_placement() {
            assert!(!validate_slug("-hello"));
            assert!(!validate_slug("hello-"));
            assert!(!validate_slug("hello--world"));
        }

        #[test]
        fn test_validate_slug_too_long() {
            let long = "a".repeat(201);
            assert!(!validate_slug(&long));
            let ok = "a".repeat(200);
            assert!(validate_slug(&ok));
        }
    }

    mod featured_tests {
        use crate::services::featured::{can_set_featured, FEATURED_LIMIT};

        #[test]
        fn test_feature_under_limit() {
            assert!(can_set_featured(0, true, false));
            assert!(can_set_featured(1, true, false));
        }

        #[test]
        fn test_feature_at_limit_denied() {
            assert!(!can_set_featured(FEATURED_LIMIT, true, false));
            assert!(!can_set_featured(FEATURED_LIMIT + 1, true, false));
        }

        #[test]
        fn test_already_featured_is_noop() {
            // Re-saving a featured post at the cap must not be denied.
            assert!(can_set_featured(FEATURED_LIMIT, true, true));
        }

        #[test]
        fn test_unfeature_always_allowed() {
            assert!(can_set_featured(0, false, false));
            assert!(can_set_featured(FEATURED_LIMIT, false, true));
            assert!(can_set_featured(FEATURED_LIMIT + 1, false, true));
        }
    }

    mod body_tests {
        use crate::services::body::{sanitize_html, text_excerpt};

        #[test]
        fn test_sanitize_strips_script() {
            let out = sanitize_html("<p>hi</p><script>alert(1)</script>");
            assert!(out.contains("<p>hi</p>"));
            assert!(!out.contains("script"));
        }

        #[test]
        fn test_sanitize_strips_event_handlers() {
            let out = sanitize_html(r#"<p onclick="steal()">hi</p>"#);
            assert!(!out.contains("onclick"));
            assert!(out.contains("hi"));
        }

        #[test]
        fn test_sanitize_keeps_images() {
            let out = sanitize_html(r#"<img src="/media/a.png" alt="a">"#);
            assert!(out.contains("img"));
            assert!(out.contains("/media/a.png"));
        }

        #[test]
        fn test_excerpt_strips_tags() {
            let out = text_excerpt("<p>Hello <strong>world</strong></p>", 200);
            assert_eq!(out, "Hello world");
        }

        #[test]
        fn test_excerpt_truncates_on_word_boundary() {
            let out = text_excerpt("<p>one two three four five</p>", 10);
            assert!(out.ends_with("..."));
            assert!(out.len() <= 13);
            assert!(!out.contains("three four"));
        }

        #[test]
        fn test_excerpt_short_body_untouched() {
            assert_eq!(text_excerpt("<p>short</p>", 200), "short");
        }
    }

    mod media_tests {
        use crate::services::media::store_image;
        use std::path::PathBuf;

        // Enough of a PNG for content sniffing to recognize it.
        const PNG_HEADER: &[u8] = &[
            0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
        ];

        fn temp_upload_dir(tag: &str) -> PathBuf {
            let dir =
                std::env::temp_dir().join(format!("quill_media_{}_{}", tag, std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            dir
        }

        #[test]
        fn test_store_image_rejects_empty_file() {
            let dir = temp_upload_dir("empty");
            assert!(store_image(&dir, "a.png", &[], 10).is_err());
            std::fs::remove_dir_all(&dir).ok();
        }

        #[test]
        fn test_store_image_rejects_oversized_file() {
            let dir = temp_upload_dir("big");
            let mut data = PNG_HEADER.to_vec();
            data.resize(1024 * 1024 + 1, 0);
            let err = store_image(&dir, "a.png", &data, 1).unwrap_err();
            assert!(err.to_string().contains("too large"));
            std::fs::remove_dir_all(&dir).ok();
        }

        #[test]
        fn test_store_image_rejects_non_image_bytes() {
            let dir = temp_upload_dir("text");
            let err =
                store_image(&dir, "notes.txt", b"just some text, not pixels", 10).unwrap_err();
            assert!(err.to_string().contains("images"));
            std::fs::remove_dir_all(&dir).ok();
        }

        #[test]
        fn test_store_image_writes_png_under_uuid_name() {
            let dir = temp_upload_dir("ok");
            let url = store_image(&dir, "photo.png", PNG_HEADER, 10).unwrap();

            let filename = url.strip_prefix("/media/").expect("served from /media/");
            assert!(filename.ends_with(".png"));
            let stem = filename.strip_suffix(".png").unwrap();
            assert!(uuid::Uuid::parse_str(stem).is_ok());
            assert!(dir.join(filename).exists());
            std::fs::remove_dir_all(&dir).ok();
        }
    }

    mod auth_tests {
        use crate::services::auth::{
            generate_session_token, hash_password, validate_password, validate_username,
            verify_password,
        };

        #[test]
        fn test_hash_and_verify() {
            let hash = hash_password("Password123").unwrap();
            assert!(verify_password("Password123", &hash));
            assert!(!verify_password("WrongPass456", &hash));
        }

        #[test]
        fn test_hashes_are_salted() {
            let a = hash_password("Password123").unwrap();
            let b = hash_password("Password123").unwrap();
            assert_ne!(a, b);
        }

        #[test]
        fn test_verify_garbage_hash() {
            assert!(!verify_password("Password123", "not-a-hash"));
        }

        #[test]
        fn test_session_tokens_unique() {
            let a = generate_session_token();
            let b = generate_session_token();
            assert_ne!(a, b);
            assert!(a.len() >= 32);
        }

        #[test]
        fn test_password_rules() {
            assert!(validate_password("Password123").is_ok());
            assert!(validate_password("short1A").is_err());
            assert!(validate_password("alllowercase1").is_err());
            assert!(validate_password("ALLUPPERCASE1").is_err());
            assert!(validate_password("NoDigitsHere").is_err());
        }

        #[test]
        fn test_username_rules() {
            assert!(validate_username("alice").is_ok());
            assert!(validate_username("alice_2").is_ok());
            assert!(validate_username("").is_err());
            assert!(validate_username("has space").is_err());
        }
    }

    mod config_tests {
        use crate::Config;

        #[test]
        fn test_load_minimal_config() {
            let dir = std::env::temp_dir().join(format!("quill_cfg_{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("quill.toml");
            std::fs::write(
                &path,
                r#"
[site]
title = "Test"
description = "Testing"
url = "http://localhost:3000"

[server]

[database]
path = ":memory:"

[media]
upload_dir = "/tmp/media"
"#,
            )
            .unwrap();

            let config = Config::load(&path).unwrap();
            assert_eq!(config.site.title, "Test");
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.content.posts_per_page, 9);
            assert_eq!(config.content.excerpt_length, 200);
            assert_eq!(config.auth.session_days, 7);

            std::fs::remove_dir_all(&dir).ok();
        }

        #[test]
        fn test_validate_rejects_zero_page_size() {
            let toml = r#"
[site]
title = "Test"
description = "Testing"
url = "http://localhost:3000"

[server]

[database]
path = ":memory:"

[content]
posts_per_page = 0

[media]
upload_dir = "/tmp/media"
"#;
            let config: crate::Config = toml::from_str(toml).unwrap();
            assert!(config.validate().is_err());
        }
    }

    mod rate_limit_tests {
        use crate::web::security::RateLimiter;
        use std::time::Duration;

        #[test]
        fn test_limiter_blocks_after_max_attempts() {
            let limiter = RateLimiter::new(3, Duration::from_secs(60));
            assert!(limiter.check("k"));
            limiter.record_attempt("k");
            limiter.record_attempt("k");
            limiter.record_attempt("k");
            assert!(!limiter.check("k"));
        }

        #[test]
        fn test_limiter_clear_resets() {
            let limiter = RateLimiter::new(1, Duration::from_secs(60));
            limiter.record_attempt("k");
            assert!(!limiter.check("k"));
            limiter.clear("k");
            assert!(limiter.check("k"));
        }

        #[test]
        fn test_limiter_keys_are_independent() {
            let limiter = RateLimiter::new(1, Duration::from_secs(60));
            limiter.record_attempt("a");
            assert!(!limiter.check("a"));
            assert!(limiter.check("b"));
        }
    }
}
