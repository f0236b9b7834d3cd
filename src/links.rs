//! Search URL builders used when backfilling missing item links.

const MAPS_SEARCH: &str = "https://www.google.com/maps/search/?api=1&query=";
const WEB_SEARCH: &str = "https://www.google.com/search?q=";
const IMAGE_SEARCH: &str = "https://www.google.com/search?tbm=isch&q=";

pub fn google_maps_search_url(query: &str) -> String {
    format!("{MAPS_SEARCH}{}", urlencoding::encode(query.trim()))
}

pub fn web_search_url(query: &str) -> String {
    format!("{WEB_SEARCH}{}", urlencoding::encode(query.trim()))
}

pub fn image_search_url(query: &str) -> String {
    format!("{IMAGE_SEARCH}{}", urlencoding::encode(query.trim()))
}

/// `name area`, skipping whichever part is blank.
pub fn place_query(name: &str, area: &str) -> Option<String> {
    let parts: Vec<&str> = [name.trim(), area.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_url_is_encoded() {
        assert_eq!(
            google_maps_search_url("渋谷駅 ハチ公"),
            "https://www.google.com/maps/search/?api=1&query=%E6%B8%8B%E8%B0%B7%E9%A7%85%20%E3%83%8F%E3%83%81%E5%85%AC"
        );
    }

    #[test]
    fn test_search_urls() {
        assert_eq!(web_search_url("a&b"), "https://www.google.com/search?q=a%26b");
        assert_eq!(
            image_search_url(" cafe "),
            "https://www.google.com/search?tbm=isch&q=cafe"
        );
    }

    #[test]
    fn test_place_query() {
        assert_eq!(
            place_query("ブルーボトル", "清澄白河").as_deref(),
            Some("ブルーボトル 清澄白河")
        );
        assert_eq!(place_query("", "表参道").as_deref(), Some("表参道"));
        assert_eq!(place_query(" ", ""), None);
    }
}
