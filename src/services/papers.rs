use crate::models::{CreatePaper, Paper, UpdatePaper};
use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;
use uuid::Uuid;

/// Creates a paper record under a freshly assigned UUID and returns
/// the id. Unlike posts, paper identity has nothing to do with the
/// title.
pub fn create_paper(db: &Database, input: CreatePaper) -> Result<String> {
    if input.title.trim().is_empty() {
        anyhow::bail!("paper title cannot be empty");
    }

    let id = Uuid::new_v4().to_string();
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO papers (id, title, authors, year, link, abstract)
         VALUES (?, ?, ?, ?, ?, ?)",
        (
            &id,
            &input.title,
            serde_json::to_string(&input.authors)?,
            &input.year,
            &input.link,
            &input.abstract_text,
        ),
    )?;
    Ok(id)
}

pub fn update_paper(db: &Database, id: &str, input: UpdatePaper) -> Result<()> {
    let conn = db.get()?;

    let current = conn
        .query_row(
            "SELECT id, title, authors, year, link, abstract, created_at, updated_at
             FROM papers WHERE id = ?",
            [id],
            row_to_paper,
        )
        .optional()?;
    let current = match current {
        Some(p) => p,
        None => anyhow::bail!("paper not found: {}", id),
    };

    let title = input.title.unwrap_or(current.title);
    let authors = input.authors.unwrap_or(current.authors);
    let year = input.year.unwrap_or(current.year);
    let link = input.link.unwrap_or(current.link);
    let abstract_text = input.abstract_text.unwrap_or(current.abstract_text);

    conn.execute(
        "UPDATE papers SET title = ?, authors = ?, year = ?, link = ?, abstract = ?,
         updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        (
            &title,
            serde_json::to_string(&authors)?,
            &year,
            &link,
            &abstract_text,
            id,
        ),
    )?;
    Ok(())
}

pub fn delete_paper(db: &Database, id: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM papers WHERE id = ?", [id])?;
    Ok(())
}

pub fn get_paper(db: &Database, id: &str) -> Result<Option<Paper>> {
    let conn = db.get()?;
    let paper = conn
        .query_row(
            "SELECT id, title, authors, year, link, abstract, created_at, updated_at
             FROM papers WHERE id = ?",
            [id],
            row_to_paper,
        )
        .optional()?;
    Ok(paper)
}

/// All papers, newest publication year first.
pub fn list_papers(db: &Database) -> Result<Vec<Paper>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, title, authors, year, link, abstract, created_at, updated_at
         FROM papers ORDER BY year DESC, created_at DESC",
    )?;
    let papers = stmt
        .query_map([], row_to_paper)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(papers)
}

pub fn count_papers(db: &Database) -> Result<usize> {
    let conn = db.get()?;
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM papers", [], |row| row.get(0))?;
    Ok(count as usize)
}

fn row_to_paper(row: &rusqlite::Row) -> rusqlite::Result<Paper> {
    let authors: Vec<String> =
        serde_json::from_str(&row.get::<_, String>(2)?).unwrap_or_default();
    Ok(Paper {
        id: row.get(0)?,
        title: row.get(1)?,
        authors,
        year: row.get(3)?,
        link: row.get(4)?,
        abstract_text: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
