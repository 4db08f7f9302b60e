use crate::models::MovieFilter;

/// Which categories the user wants to see. Any combination may be on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FilterPreferences {
    pub show_popular: bool,
    pub show_top_rated: bool,
    pub show_favorites: bool,
}

impl Default for FilterPreferences {
    fn default() -> Self {
        Self { show_popular: true, show_top_rated: true, show_favorites: false }
    }
}

impl FilterPreferences {
    pub fn toggle_popular(&mut self) {
        self.show_popular = !self.show_popular;
    }

    pub fn toggle_top_rated(&mut self) {
        self.show_top_rated = !self.show_top_rated;
    }

    pub fn toggle_favorites(&mut self) {
        self.show_favorites = !self.show_favorites;
    }

    /// Active categories in display order; popular when nothing is selected.
    pub fn active_filters(&self) -> Vec<MovieFilter> {
        let active: Vec<MovieFilter> = [
            (self.show_popular, MovieFilter::Popular),
            (self.show_top_rated, MovieFilter::TopRated),
            (self.show_favorites, MovieFilter::Favorites),
        ]
        .into_iter()
        .filter_map(|(on, filter)| on.then_some(filter))
        .collect();

        if active.is_empty() { vec![MovieFilter::Popular] } else { active }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_popular_and_top_rated() {
        assert_eq!(
            FilterPreferences::default().active_filters(),
            vec![MovieFilter::Popular, MovieFilter::TopRated]
        );
    }

    #[test]
    fn toggles_combine_in_display_order() {
        let mut prefs = FilterPreferences::default();
        prefs.toggle_favorites();
        prefs.toggle_popular();
        assert_eq!(prefs.active_filters(), vec![MovieFilter::TopRated, MovieFilter::Favorites]);
    }

    #[test]
    fn nothing_selected_falls_back_to_popular() {
        let mut prefs = FilterPreferences::default();
        prefs.toggle_popular();
        prefs.toggle_top_rated();
        assert_eq!(prefs.active_filters(), vec![MovieFilter::Popular]);
    }
}
