use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub tconst: String,
    #[serde(rename = "originalTitle")]
    pub original_title: String,
    #[serde(rename = "startYear", deserialize_with = "csv::invalid_option")]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub genres: String,
    #[serde(rename = "averageRating", deserialize_with = "csv::invalid_option")]
    pub average_rating: Option<f64>,
    #[serde(rename = "numVotes", deserialize_with = "csv::invalid_option")]
    pub num_votes: Option<u64>,
    #[serde(rename = "Streaming", default)]
    pub streaming: String,
}

impl Movie {
    pub fn genre_list(&self) -> impl Iterator<Item = &str> {
        split_list(&self.genres)
    }

    pub fn platform_list(&self) -> impl Iterator<Item = &str> {
        split_list(&self.streaming)
    }

    pub fn imdb_url(&self) -> String {
        format!("https://www.imdb.com/title/{}/", self.tconst)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Charge `movies_platform.csv`; les films sans plateforme de streaming sont écartés.
pub fn load_movies(path: &Path) -> Result<Vec<Movie>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut movies = Vec::new();
    for (i, record) in reader.deserialize::<Movie>().enumerate() {
        let movie = record.with_context(|| format!("Erreur lecture ligne {}", i + 1))?;
        if !movie.streaming.trim().is_empty() {
            movies.push(movie);
        }
    }

    info!(path = %path.display(), movies = movies.len(), "films chargés");
    Ok(movies)
}

#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub years: Option<(i32, i32)>,
    pub platform: Option<String>,
    pub genres: Vec<String>,
    pub search: Option<String>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        if let Some((from, to)) = self.years {
            match movie.start_year {
                Some(y) if y >= from && y <= to => {}
                _ => return false,
            }
        }
        if let Some(platform) = &self.platform {
            if !movie.streaming.contains(platform.as_str()) {
                return false;
            }
        }
        if !self.genres.iter().all(|g| movie.genres.contains(g.as_str())) {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !movie.original_title.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, movies: &'a [Movie]) -> Vec<&'a Movie> {
        movies.iter().filter(|m| self.matches(m)).collect()
    }
}

pub fn platforms(movies: &[Movie]) -> Vec<String> {
    let set: BTreeSet<&str> = movies.iter().flat_map(Movie::platform_list).collect();
    set.into_iter().map(String::from).collect()
}

pub fn genres(movies: &[Movie]) -> Vec<String> {
    let set: BTreeSet<&str> = movies.iter().flat_map(Movie::genre_list).collect();
    set.into_iter().map(String::from).collect()
}
