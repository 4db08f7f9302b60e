const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/342x513?text=No+Image";

/// Video type the details screen treats as a trailer.
pub const TRAILER: &str = "Trailer";

#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub overview: String,
    pub poster_path: String,
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i32,
    pub popularity: f64,
    pub original_language: String,
    pub favorite: bool,
    pub top_rated: bool,
    pub popular: bool,
}

impl Movie {
    pub fn poster_url(&self, size: PosterSize) -> String {
        poster_url(&self.poster_path, size)
    }

    pub fn with_favorite(&self, favorite: bool) -> Self {
        Self { favorite, ..self.clone() }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PosterSize {
    W185,
    #[default]
    W342,
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

pub fn poster_url(poster_path: &str, size: PosterSize) -> String {
    if poster_path.trim().is_empty() {
        return POSTER_PLACEHOLDER.to_string();
    }
    format!("{IMAGE_BASE_URL}/{}{poster_path}", size.as_str())
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MovieFilter {
    Popular,
    TopRated,
    Favorites,
    All,
}

/// `identity` is `None` until storage assigns one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Video {
    pub identity: Option<i32>,
    pub movie_id: i32,
    pub image_url: String,
    pub lang: String,
    pub region: String,
    pub provider_key: String,
    pub site: String,
    pub size: i32,
    pub kind: String,
}

impl Video {
    pub fn is_trailer(&self) -> bool {
        self.kind == TRAILER
    }

    pub fn is_youtube(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
    }

    pub fn watch_url(&self) -> Option<String> {
        self.is_youtube().then(|| format!("https://www.youtube.com/watch?v={}", self.provider_key))
    }
}

pub fn youtube_thumbnail(provider_key: &str) -> String {
    format!("https://img.youtube.com/vi/{provider_key}/hqdefault.jpg")
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Review {
    pub identity: Option<i32>,
    pub movie_id: i32,
    pub author: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieDetails {
    pub videos: Vec<Video>,
    pub trailers: Vec<Video>,
    pub reviews: Vec<Review>,
}
