use quill::models::{AboutContent, CreatePaper, CreatePost, UpdatePaper, UpdatePost};
use quill::services::posts::PostError;
use quill::services::{about, auth, papers, posts};
use quill::Database;

fn create_test_db() -> Database {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let id: u32 = rng.gen();
    let name = format!("test_db_{}", id);

    let db = Database::open_memory(&name).expect("Failed to create test database");
    db.migrate().expect("Failed to run migrations");
    db
}

fn sample_post(title: &str, featured: bool) -> CreatePost {
    CreatePost {
        title: title.to_string(),
        date: "2025-06-01".to_string(),
        body_html: "<p>Some thoughts.</p>".to_string(),
        tags: vec!["ai".to_string(), "philosophy".to_string()],
        image_url: None,
        featured,
    }
}

// Valid test passwords: 8+ chars, uppercase, lowercase, number
const TEST_PASSWORD: &str = "Password123";
const WRONG_PASSWORD: &str = "WrongPass456";

mod post_integration_tests {
    use super::*;

    #[test]
    fn test_create_post_derives_slug() {
        let db = create_test_db();

        let slug = posts::create_post(&db, sample_post("Él Amanecer de la IA", false))
            .expect("Failed to create post");
        assert_eq!(slug, "el-amanecer-de-la-ia");

        let post = posts::get_post(&db, &slug)
            .expect("Query failed")
            .expect("Post should exist");
        assert_eq!(post.title, "Él Amanecer de la IA");
        assert_eq!(post.tags, vec!["ai", "philosophy"]);
        assert!(!post.featured);
    }

    #[test]
    fn test_create_post_empty_title_rejected() {
        let db = create_test_db();

        let err = posts::create_post(&db, sample_post("!!!", false)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PostError>(),
            Some(PostError::EmptyTitle)
        ));
    }

    #[test]
    fn test_create_post_overlong_title_rejected() {
        let db = create_test_db();

        // Derives to a slug far past the 200-character ceiling.
        let long_title = "word ".repeat(60);
        let err = posts::create_post(&db, sample_post(&long_title, false)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PostError>(),
            Some(PostError::TitleTooLong)
        ));
    }

    #[test]
    fn test_create_post_duplicate_slug_rejected() {
        let db = create_test_db();

        posts::create_post(&db, sample_post("Same Title", false)).unwrap();
        let err = posts::create_post(&db, sample_post("Same   Title!", false)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PostError>(),
            Some(PostError::SlugTaken(_))
        ));
    }

    #[test]
    fn test_post_body_is_sanitized() {
        let db = create_test_db();

        let mut input = sample_post("Scripted", false);
        input.body_html = "<p>ok</p><script>alert(1)</script>".to_string();
        let slug = posts::create_post(&db, input).unwrap();

        let post = posts::get_post(&db, &slug).unwrap().unwrap();
        assert!(post.body_html.contains("<p>ok</p>"));
        assert!(!post.body_html.contains("script"));
    }

    #[test]
    fn test_update_post_keeps_slug() {
        let db = create_test_db();

        let slug = posts::create_post(&db, sample_post("Original Title", false)).unwrap();

        posts::update_post(
            &db,
            &slug,
            UpdatePost {
                title: Some("Renamed Title".to_string()),
                ..Default::default()
            },
        )
        .expect("Failed to update post");

        let post = posts::get_post(&db, &slug).unwrap().unwrap();
        assert_eq!(post.slug, slug);
        assert_eq!(post.title, "Renamed Title");
    }

    #[test]
    fn test_update_missing_post_fails() {
        let db = create_test_db();

        let result = posts::update_post(&db, "no-such-post", UpdatePost::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_post() {
        let db = create_test_db();

        let slug = posts::create_post(&db, sample_post("Ephemeral", false)).unwrap();
        posts::delete_post(&db, &slug).expect("Failed to delete post");
        assert!(posts::get_post(&db, &slug).unwrap().is_none());
    }

    #[test]
    fn test_list_posts_newest_first() {
        let db = create_test_db();

        let mut older = sample_post("Older", false);
        older.date = "2024-01-01".to_string();
        posts::create_post(&db, older).unwrap();

        let mut newer = sample_post("Newer", false);
        newer.date = "2025-01-01".to_string();
        posts::create_post(&db, newer).unwrap();

        let all = posts::list_posts(&db, 10, 0).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Newer");
        assert_eq!(all[1].title, "Older");
    }
}

mod featured_integration_tests {
    use super::*;

    #[test]
    fn test_featured_cap_enforced_on_create() {
        let db = create_test_db();

        posts::create_post(&db, sample_post("First", true)).unwrap();
        posts::create_post(&db, sample_post("Second", true)).unwrap();

        let err = posts::create_post(&db, sample_post("Third", true)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PostError>(),
            Some(PostError::FeaturedLimitReached)
        ));

        // The post was not written at all.
        assert!(posts::get_post(&db, "third").unwrap().is_none());
        assert_eq!(posts::count_featured(&db).unwrap(), 2);
    }

    #[test]
    fn test_featured_cap_enforced_on_update() {
        let db = create_test_db();

        posts::create_post(&db, sample_post("First", true)).unwrap();
        posts::create_post(&db, sample_post("Second", true)).unwrap();
        let slug = posts::create_post(&db, sample_post("Third", false)).unwrap();

        let err = posts::update_post(
            &db,
            &slug,
            UpdatePost {
                featured: Some(true),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PostError>(),
            Some(PostError::FeaturedLimitReached)
        ));
    }

    #[test]
    fn test_resave_featured_post_at_cap() {
        let db = create_test_db();

        let slug = posts::create_post(&db, sample_post("First", true)).unwrap();
        posts::create_post(&db, sample_post("Second", true)).unwrap();

        // Editing an already-featured post must not trip the cap.
        posts::update_post(
            &db,
            &slug,
            UpdatePost {
                title: Some("First, Revised".to_string()),
                featured: Some(true),
                ..Default::default()
            },
        )
        .expect("Re-saving a featured post should succeed");
    }

    #[test]
    fn test_unfeature_frees_a_slot() {
        let db = create_test_db();

        let first = posts::create_post(&db, sample_post("First", true)).unwrap();
        posts::create_post(&db, sample_post("Second", true)).unwrap();
        let third = posts::create_post(&db, sample_post("Third", false)).unwrap();

        posts::update_post(
            &db,
            &first,
            UpdatePost {
                featured: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        posts::update_post(
            &db,
            &third,
            UpdatePost {
                featured: Some(true),
                ..Default::default()
            },
        )
        .expect("Slot freed by un-featuring should be usable");

        assert_eq!(posts::count_featured(&db).unwrap(), 2);
    }

    #[test]
    fn test_list_featured_never_exceeds_limit() {
        let db = create_test_db();

        posts::create_post(&db, sample_post("First", true)).unwrap();
        posts::create_post(&db, sample_post("Second", true)).unwrap();
        posts::create_post(&db, sample_post("Plain", false)).unwrap();

        let featured = posts::list_featured(&db).unwrap();
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|p| p.featured));
    }
}

mod paper_integration_tests {
    use super::*;

    fn sample_paper(title: &str, year: &str) -> CreatePaper {
        CreatePaper {
            title: title.to_string(),
            authors: vec!["A. Author".to_string(), "B. Writer".to_string()],
            year: year.to_string(),
            link: "https://example.org/paper".to_string(),
            abstract_text: "We study things.".to_string(),
        }
    }

    #[test]
    fn test_create_and_get_paper() {
        let db = create_test_db();

        let id = papers::create_paper(&db, sample_paper("On Things", "2024"))
            .expect("Failed to create paper");
        assert!(!id.is_empty());

        let paper = papers::get_paper(&db, &id)
            .expect("Query failed")
            .expect("Paper should exist");
        assert_eq!(paper.title, "On Things");
        assert_eq!(paper.authors, vec!["A. Author", "B. Writer"]);
        assert_eq!(paper.year, "2024");
    }

    #[test]
    fn test_create_paper_empty_title_rejected() {
        let db = create_test_db();
        assert!(papers::create_paper(&db, sample_paper("  ", "2024")).is_err());
    }

    #[test]
    fn test_papers_listed_by_year_desc() {
        let db = create_test_db();

        papers::create_paper(&db, sample_paper("Old", "2019")).unwrap();
        papers::create_paper(&db, sample_paper("New", "2025")).unwrap();
        papers::create_paper(&db, sample_paper("Mid", "2022")).unwrap();

        let all = papers::list_papers(&db).unwrap();
        let years: Vec<&str> = all.iter().map(|p| p.year.as_str()).collect();
        assert_eq!(years, vec!["2025", "2022", "2019"]);
    }

    #[test]
    fn test_update_and_delete_paper() {
        let db = create_test_db();

        let id = papers::create_paper(&db, sample_paper("Draft", "2024")).unwrap();

        papers::update_paper(
            &db,
            &id,
            UpdatePaper {
                title: Some("Final".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(papers::get_paper(&db, &id).unwrap().unwrap().title, "Final");

        papers::delete_paper(&db, &id).unwrap();
        assert!(papers::get_paper(&db, &id).unwrap().is_none());
    }
}

mod about_integration_tests {
    use super::*;

    #[test]
    fn test_about_defaults_to_empty() {
        let db = create_test_db();

        let about = about::get_about(&db).expect("Failed to read about content");
        assert_eq!(about.intro, "");
        assert_eq!(about.email, "");
    }

    #[test]
    fn test_save_and_reload_about() {
        let db = create_test_db();

        let content = AboutContent {
            intro: "Hello, I write things.".to_string(),
            paragraph1: "First paragraph.".to_string(),
            paragraph2: "Second paragraph.".to_string(),
            paragraph3: String::new(),
            image_url: "/media/portrait.jpg".to_string(),
            linkedin_url: "https://linkedin.com/in/example".to_string(),
            orcid_url: String::new(),
            email: "me@example.org".to_string(),
        };
        about::save_about(&db, &content).expect("Failed to save about content");

        let loaded = about::get_about(&db).unwrap();
        assert_eq!(loaded.intro, content.intro);
        assert_eq!(loaded.paragraph2, content.paragraph2);
        assert_eq!(loaded.paragraph3, "");
        assert_eq!(loaded.email, content.email);
    }

    #[test]
    fn test_save_about_overwrites() {
        let db = create_test_db();

        let mut content = AboutContent {
            intro: "v1".to_string(),
            ..Default::default()
        };
        about::save_about(&db, &content).unwrap();

        content.intro = "v2".to_string();
        about::save_about(&db, &content).unwrap();

        assert_eq!(about::get_about(&db).unwrap().intro, "v2");
    }
}

mod auth_integration_tests {
    use super::*;

    #[test]
    fn test_create_and_authenticate_user() {
        let db = create_test_db();

        let user_id = auth::create_user(&db, "testuser", "test@example.com", TEST_PASSWORD)
            .expect("Failed to create user");
        assert!(user_id > 0);

        let user = auth::authenticate(&db, "testuser", TEST_PASSWORD)
            .expect("Authentication error")
            .expect("User should be found");
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "test@example.com");
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let db = create_test_db();

        auth::create_user(&db, "testuser", "test@example.com", TEST_PASSWORD).unwrap();
        let result = auth::authenticate(&db, "testuser", WRONG_PASSWORD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let db = create_test_db();
        let result = auth::authenticate(&db, "nobody", TEST_PASSWORD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let db = create_test_db();

        auth::create_user(&db, "testuser", "test@example.com", TEST_PASSWORD).unwrap();
        assert!(auth::create_user(&db, "testuser", "other@example.com", TEST_PASSWORD).is_err());
    }

    #[test]
    fn test_session_lifecycle() {
        let db = create_test_db();

        let user_id = auth::create_user(&db, "testuser", "test@example.com", TEST_PASSWORD).unwrap();
        let token = auth::create_session(&db, user_id, 7).expect("Failed to create session");

        let user = auth::validate_session(&db, &token)
            .expect("Validation error")
            .expect("Session should resolve to a user");
        assert_eq!(user.username, "testuser");

        auth::delete_session(&db, &token).unwrap();
        assert!(auth::validate_session(&db, &token).unwrap().is_none());
    }

    #[test]
    fn test_validate_bogus_session() {
        let db = create_test_db();
        assert!(auth::validate_session(&db, "bogus-token").unwrap().is_none());
    }

    #[test]
    fn test_has_users() {
        let db = create_test_db();
        assert!(!auth::has_users(&db).unwrap());

        auth::create_user(&db, "testuser", "test@example.com", TEST_PASSWORD).unwrap();
        assert!(auth::has_users(&db).unwrap());
    }
}
