//! Route strings for opening pages directly
//!
//! Routes look like `pokemon/25`, `categories/fire` or `favorites`. A leading
//! `#` or `/` is accepted so links copied from the web version still work.

/// A page of the application and its parameter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    /// Browse listing, optionally with a query to search for
    Search(Option<String>),
    /// Type index, or the members of one type
    Categories(Option<String>),
    /// Detail page for an id or name
    Pokemon(String),
    Random,
    Favorites,
    About,
}

impl Route {
    /// Parses a route string
    ///
    /// Unknown routes and a `pokemon` route without a parameter fall back to
    /// `Home`. Everything after the first `/` is the parameter.
    pub fn parse(input: &str) -> Self {
        let path = input.trim().trim_start_matches('#').trim_start_matches('/');
        let (name, params) = match path.split_once('/') {
            Some((name, params)) => (name, params.trim()),
            None => (path, ""),
        };
        let param = (!params.is_empty()).then(|| params.to_string());

        match name.to_lowercase().as_str() {
            "" | "home" => Route::Home,
            "search" => Route::Search(param),
            "categories" | "type" => Route::Categories(param.map(|p| p.to_lowercase())),
            "pokemon" => match param {
                Some(id) => Route::Pokemon(id.to_lowercase()),
                None => Route::Home,
            },
            "random" => Route::Random,
            "favorites" => Route::Favorites,
            "about" => Route::About,
            _ => Route::Home,
        }
    }

    /// Whether `input` names a known route
    pub fn is_known(input: &str) -> bool {
        let path = input.trim().trim_start_matches('#').trim_start_matches('/');
        let name = path.split('/').next().unwrap_or_default().to_lowercase();
        matches!(
            name.as_str(),
            "" | "home"
                | "search"
                | "categories"
                | "type"
                | "pokemon"
                | "random"
                | "favorites"
                | "about"
        )
    }

    /// Formats the route back to `name/param`
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "home".to_string(),
            Route::Search(None) => "search".to_string(),
            Route::Search(Some(query)) => format!("search/{}", query),
            Route::Categories(None) => "categories".to_string(),
            Route::Categories(Some(kind)) => format!("categories/{}", kind),
            Route::Pokemon(id) => format!("pokemon/{}", id),
            Route::Random => "random".to_string(),
            Route::Favorites => "favorites".to_string(),
            Route::About => "about".to_string(),
        }
    }
}
