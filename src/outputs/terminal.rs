//! Plain-text rendering of the story list.

use crate::session::StoryList;

/// Shown while a load is in flight.
pub const LOADING: &str = "Loading stories…";

/// Render the list the way the terminal front end shows it.
///
/// Stories are numbered from 1 so the numbers can be typed back to open a
/// story. Each entry shows the title, then the section and publication date
/// on an indented second line. An empty list renders its empty-state message.
pub fn render_list(list: &StoryList) -> String {
    let mut out = String::new();
    if list.is_loading() {
        out.push_str(LOADING);
        out.push('\n');
    }

    if list.is_empty() {
        if let Some(message) = list.empty_state() {
            out.push_str(message);
            out.push('\n');
        }
        return out;
    }

    let width = list.len().to_string().len();
    for (i, story) in list.stories().iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}. {}\n",
            i + 1,
            story.title().unwrap_or("(untitled)")
        ));

        let details: Vec<String> = [story.section().map(str::to_string), story.display_date()]
            .into_iter()
            .flatten()
            .collect();
        if !details.is_empty() {
            out.push_str(&format!("{:width$}  {}\n", "", details.join(" · ")));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Story;
    use crate::session::NO_CONNECTION;

    #[test]
    fn test_render_stories() {
        let mut list = StoryList::default();
        list.replace_all(vec![
            Story::new(
                Some("Headline A".into()),
                Some("Politics".into()),
                Some("2023-01-01T10:00:00Z".into()),
                Some("https://x/a".into()),
            ),
            Story::new(None, None, None, None),
        ]);

        assert_eq!(
            render_list(&list),
            "1. Headline A\n   Politics · 2023-01-01 10:00:00\n2. (untitled)\n"
        );
    }

    #[test]
    fn test_render_pads_numbers() {
        let mut list = StoryList::default();
        list.replace_all((0..10).map(|i| Story::new(Some(format!("S{i}")), None, None, None)).collect());
        let out = render_list(&list);
        assert!(out.starts_with(" 1. S0\n"));
        assert!(out.ends_with("10. S9\n"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut list = StoryList::default();
        assert_eq!(render_list(&list), "");

        list.set_empty_state(NO_CONNECTION);
        assert_eq!(render_list(&list), format!("{NO_CONNECTION}\n"));
    }

    #[test]
    fn test_render_loading_indicator() {
        let mut list = StoryList::default();
        list.set_loading(true);
        assert_eq!(render_list(&list), format!("{LOADING}\n"));
    }
}
