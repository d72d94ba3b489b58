use std::time::Duration;

use async_trait::async_trait;
use jiff::civil::Date;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use wreq::header::REFERER;

use crate::{
    models::{DiaryRecord, FilmDetailRecord, ProfileRecord, WatchedFilmRecord, WatchlistRecord},
    ratelimit::RequestLimiter,
    remote::{FetchError, RemoteSource},
};

/// Scrapes the public HTML pages of a Letterboxd-style site. Owns the
/// request limiter for the run it serves, so constructing one client per
/// sync run gives each run independent spacing.
#[derive(Clone)]
pub struct LetterboxdClient {
    http: wreq::Client,
    base_url: String,
    limiter: RequestLimiter,
}

impl LetterboxdClient {
    pub fn new(http: wreq::Client, base_url: &str, min_delay: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RequestLimiter::new(min_delay),
        }
    }

    async fn get_page(&self, url: &str) -> Result<String, FetchError> {
        self.limiter.wait().await;
        debug!(url = %url, "fetching page");
        let resp =
            self.http.get(url).header(REFERER, format!("{}/", self.base_url)).send().await?;
        let status = resp.status().as_u16();
        if status == 429 || status == 503 {
            return Err(FetchError::Throttled { status });
        }
        if !resp.status().is_success() {
            return Err(FetchError::Status { status, url: url.to_string() });
        }
        Ok(resp.text().await?)
    }

    /// Walks `page/1/`, `page/2/`, ... until a page parses to no items.
    async fn fetch_paged<T>(
        &self,
        path: &str,
        parse: fn(&str) -> Vec<T>,
    ) -> Result<Vec<T>, FetchError> {
        let mut out = Vec::new();
        let mut page = 1;

        loop {
            let url = if page == 1 {
                format!("{}/{}", self.base_url, path)
            } else {
                format!("{}/{}page/{}/", self.base_url, path, page)
            };

            let html = self.get_page(&url).await?;
            let items = parse(&html);
            debug!(page = page, items = items.len(), "parsed list page");

            if items.is_empty() {
                break;
            }
            out.extend(items);
            page += 1;
        }

        Ok(out)
    }
}

#[async_trait]
impl RemoteSource for LetterboxdClient {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileRecord, FetchError> {
        let url = format!("{}/{}/", self.base_url, urlencoding::encode(username));
        let html = self.get_page(&url).await?;
        Ok(parse_profile(&html, username))
    }

    async fn fetch_watched_films(
        &self,
        username: &str,
    ) -> Result<Vec<WatchedFilmRecord>, FetchError> {
        let path = format!("{}/films/", urlencoding::encode(username));
        let films = self.fetch_paged(&path, parse_films_page).await?;
        debug!(username = %username, total = films.len(), "fetched watched films");
        Ok(films)
    }

    async fn fetch_diary(&self, username: &str) -> Result<Vec<DiaryRecord>, FetchError> {
        let path = format!("{}/films/diary/", urlencoding::encode(username));
        let entries = self.fetch_paged(&path, parse_diary_page).await?;
        debug!(username = %username, total = entries.len(), "fetched diary");
        Ok(entries)
    }

    async fn fetch_watchlist(&self, username: &str) -> Result<Vec<WatchlistRecord>, FetchError> {
        let path = format!("{}/watchlist/", urlencoding::encode(username));
        let items = self.fetch_paged(&path, parse_watchlist_page).await?;
        debug!(username = %username, total = items.len(), "fetched watchlist");
        Ok(items)
    }

    async fn fetch_film_detail(&self, slug: &str) -> Result<FilmDetailRecord, FetchError> {
        let url = format!("{}/film/{}/", self.base_url, urlencoding::encode(slug));
        let html = self.get_page(&url).await?;
        parse_film_detail(&html, slug)
    }
}

fn parse_films_page(html: &str) -> Vec<WatchedFilmRecord> {
    let doc = Html::parse_document(html);
    let item_sel = Selector::parse("li.griditem").unwrap();
    let poster_sel = Selector::parse("div.react-component[data-item-slug]").unwrap();
    let rating_sel = Selector::parse("span.rating").unwrap();
    let like_sel = Selector::parse("span.like").unwrap();

    let mut out = Vec::new();
    for item in doc.select(&item_sel) {
        let Some(poster) = item.select(&poster_sel).next() else { continue };
        let Some(slug) = poster.value().attr("data-item-slug") else { continue };
        if slug.is_empty() {
            continue;
        }
        let (name, year) = name_and_year(poster.value().attr("data-item-name"));
        let rating = item.select(&rating_sel).next().and_then(|el| rating_from_classes(&el));
        let liked = item.select(&like_sel).next().is_some();
        out.push(WatchedFilmRecord { slug: slug.to_string(), name, year, rating, liked });
    }
    out
}

fn parse_diary_page(html: &str) -> Vec<DiaryRecord> {
    let doc = Html::parse_document(html);
    let row_sel = Selector::parse("tr.diary-entry-row").unwrap();
    let film_sel = Selector::parse("td.td-film-details [data-film-slug]").unwrap();
    let day_sel = Selector::parse("td.td-day a").unwrap();
    let rating_sel = Selector::parse("td.td-rating span.rating").unwrap();
    let rewatch_sel = Selector::parse("td.td-rewatch").unwrap();
    let like_sel = Selector::parse("td.td-like span.icon-liked").unwrap();

    let mut out = Vec::new();
    for row in doc.select(&row_sel) {
        let Some(id) = row.value().attr("data-viewing-id") else { continue };
        let Some(film) = row.select(&film_sel).next() else { continue };
        let Some(slug) = film.value().attr("data-film-slug") else { continue };
        if id.is_empty() || slug.is_empty() {
            continue;
        }

        let film_name = film
            .value()
            .attr("data-film-name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let watched_date = row
            .select(&day_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(date_from_diary_href);
        let rating = row.select(&rating_sel).next().and_then(|el| rating_from_classes(&el));
        // The rewatch cell is always present; an icon-status-off class marks
        // a first watch.
        let rewatch = row
            .select(&rewatch_sel)
            .next()
            .map(|td| !td.value().classes().any(|c| c == "icon-status-off"))
            .unwrap_or(false);
        let liked = row.select(&like_sel).next().is_some();

        out.push(DiaryRecord {
            id: id.to_string(),
            film_slug: slug.to_string(),
            film_name,
            watched_date,
            rating,
            rewatch,
            liked,
        });
    }
    out
}

fn parse_watchlist_page(html: &str) -> Vec<WatchlistRecord> {
    let doc = Html::parse_document(html);
    let poster_sel = Selector::parse("li.griditem div.react-component[data-item-slug]").unwrap();

    let mut out = Vec::new();
    for el in doc.select(&poster_sel) {
        let Some(slug) = el.value().attr("data-item-slug") else { continue };
        if slug.is_empty() {
            continue;
        }
        let (name, year) = name_and_year(el.value().attr("data-item-name"));
        out.push(WatchlistRecord { slug: slug.to_string(), name, year });
    }
    out
}

fn parse_profile(html: &str, username: &str) -> ProfileRecord {
    let doc = Html::parse_document(html);

    let display_name = first_text(&doc, "h1.person-display-name .displayname");
    let bio = first_text(&doc, ".bio p");
    let location = first_text(&doc, ".profile-metadata .metadatum.-location .label");
    let website_sel = Selector::parse(".profile-metadata a.url").unwrap();
    let website = doc
        .select(&website_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    let fav_sel = Selector::parse("#favourites div.react-component[data-item-slug]").unwrap();
    let favorites = doc
        .select(&fav_sel)
        .filter_map(|el| el.value().attr("data-item-slug"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let stat_sel = Selector::parse(".profile-statistic").unwrap();
    let value_sel = Selector::parse(".value").unwrap();
    let def_sel = Selector::parse(".definition").unwrap();
    let mut stats = serde_json::Map::new();
    for el in doc.select(&stat_sel) {
        let Some(value) = el.select(&value_sel).next() else { continue };
        let Some(def) = el.select(&def_sel).next() else { continue };
        let key = collapse_text(def).to_lowercase().replace(' ', "_");
        if key.is_empty() {
            continue;
        }
        let raw = collapse_text(value).replace(',', "");
        if let Ok(n) = raw.parse::<i64>() {
            stats.insert(key, serde_json::Value::from(n));
        } else if !raw.is_empty() {
            stats.insert(key, serde_json::Value::from(raw));
        }
    }

    ProfileRecord {
        username: username.to_string(),
        display_name,
        bio,
        location,
        website,
        favorites,
        stats: serde_json::Value::Object(stats),
    }
}

fn parse_film_detail(html: &str, slug: &str) -> Result<FilmDetailRecord, FetchError> {
    let doc = Html::parse_document(html);

    let og_title = meta_content(&doc, "meta[property='og:title']").ok_or_else(|| {
        FetchError::Parse { what: "film detail", detail: format!("{slug}: missing og:title") }
    })?;
    let (title, year) = split_trailing_year(&og_title);
    if title.is_empty() {
        return Err(FetchError::Parse {
            what: "film detail",
            detail: format!("{slug}: empty title"),
        });
    }

    let body_sel = Selector::parse("body").unwrap();
    let mut tmdb_id = doc
        .select(&body_sel)
        .next()
        .and_then(|body| body.value().attr("data-tmdb-id"))
        .filter(|id| !id.is_empty())
        .and_then(|id| id.parse::<i32>().ok());
    if tmdb_id.is_none() {
        let link_sel = Selector::parse("a[href*='themoviedb.org']").unwrap();
        tmdb_id = doc
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(tmdb_id_from_url);
    }

    let imdb_sel = Selector::parse("a[href*='imdb.com/title/']").unwrap();
    let imdb_id = doc
        .select(&imdb_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(imdb_id_from_url);

    let average_rating = meta_content(&doc, "meta[name='twitter:data2']")
        .and_then(|c| c.split_whitespace().next().and_then(|n| n.parse().ok()));

    Ok(FilmDetailRecord {
        slug: slug.to_string(),
        title: title.to_string(),
        original_title: first_text(&doc, "h2.originalname"),
        year,
        runtime_minutes: first_text(&doc, "p.text-link.text-footer")
            .and_then(|t| parse_runtime(&t)),
        tagline: first_text(&doc, "h4.tagline"),
        synopsis: meta_content(&doc, "meta[property='og:description']"),
        poster_url: meta_content(&doc, "meta[property='og:image']"),
        letterboxd_url: meta_content(&doc, "meta[property='og:url']"),
        genres: link_texts(&doc, "#tab-genres a[href*='/films/genre/']"),
        directors: link_texts(&doc, "a[href*='/director/']"),
        cast: link_texts(&doc, "#tab-cast a[href*='/actor/']"),
        crew: parse_crew(&doc),
        countries: link_texts(&doc, "#tab-details a[href*='/films/country/']"),
        languages: link_texts(&doc, "#tab-details a[href*='/films/language/']"),
        studios: link_texts(&doc, "#tab-details a[href*='/studio/']"),
        average_rating,
        tmdb_id,
        imdb_id,
    })
}

fn parse_crew(doc: &Html) -> Option<serde_json::Value> {
    let mut crew = serde_json::Map::new();
    for (role, selector) in [
        ("writer", "a[href*='/writer/']"),
        ("editor", "a[href*='/editor/']"),
        ("cinematography", "a[href*='/cinematography/']"),
        ("composer", "a[href*='/composer/']"),
    ] {
        let names = link_texts(doc, selector);
        if !names.is_empty() {
            crew.insert(role.to_string(), serde_json::json!(names));
        }
    }
    (!crew.is_empty()).then(|| serde_json::Value::Object(crew))
}

fn name_and_year(raw: Option<&str>) -> (Option<String>, Option<i16>) {
    match raw {
        Some(raw) => {
            let (title, year) = split_trailing_year(raw);
            ((!title.is_empty()).then(|| title.to_string()), year)
        },
        None => (None, None),
    }
}

/// Splits a trailing parenthesized four-digit year off a display title:
/// "Heat (1995)" -> ("Heat", Some(1995)).
fn split_trailing_year(raw: &str) -> (&str, Option<i16>) {
    let s = raw.trim();
    let Some(rest) = s.strip_suffix(')') else {
        return (s, None);
    };
    let Some(open) = rest.rfind('(') else {
        return (s, None);
    };
    let inside = &rest[open + 1..];
    if inside.len() == 4 && inside.chars().all(|c| c.is_ascii_digit()) {
        (s[..open].trim_end(), inside.parse().ok())
    } else {
        (s, None)
    }
}

/// Ratings are rendered as a `rated-N` class where N counts half-stars.
fn rating_from_classes(el: &ElementRef) -> Option<f64> {
    el.value()
        .classes()
        .find_map(|class| class.strip_prefix("rated-"))
        .and_then(|n| n.parse::<u8>().ok())
        .map(|halves| f64::from(halves) / 2.0)
}

/// Diary day links look like `/{user}/films/diary/for/2024/02/29/`.
fn date_from_diary_href(href: &str) -> Option<Date> {
    let mut parts = href.split('/').filter(|p| !p.is_empty()).skip_while(|p| *p != "for");
    parts.next()?;
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Date::new(year, month, day).ok()
}

fn tmdb_id_from_url(url: &str) -> Option<i32> {
    for marker in ["/movie/", "/tv/"] {
        if let Some(pos) = url.find(marker) {
            let tail = &url[pos + marker.len()..];
            return tail.split(|c: char| !c.is_ascii_digit()).next()?.parse().ok();
        }
    }
    None
}

fn imdb_id_from_url(url: &str) -> Option<String> {
    let pos = url.find("/title/")?;
    let tail = &url[pos + "/title/".len()..];
    let id = tail.split('/').next()?;
    id.starts_with("tt").then(|| id.to_string())
}

fn parse_runtime(text: &str) -> Option<i32> {
    let mut tokens = text.split_whitespace().peekable();
    while let Some(tok) = tokens.next() {
        if let Ok(mins) = tok.replace(',', "").parse::<i32>() {
            if tokens.peek().is_some_and(|next| next.starts_with("min")) {
                return Some(mins);
            }
        }
    }
    None
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel).next().map(collapse_text).filter(|s| !s.is_empty())
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Element text with whitespace collapsed, deduplicated, in document order.
fn link_texts(doc: &Html, selector: &str) -> Vec<String> {
    let sel = Selector::parse(selector).unwrap();
    let mut out: Vec<String> = Vec::new();
    for el in doc.select(&sel) {
        let text = collapse_text(el);
        if !text.is_empty() && !out.contains(&text) {
            out.push(text);
        }
    }
    out
}

fn collapse_text(el: ElementRef) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trailing_year() {
        assert_eq!(split_trailing_year("Heat (1995)"), ("Heat", Some(1995)));
        assert_eq!(split_trailing_year("  Alien (1979) "), ("Alien", Some(1979)));
        assert_eq!(split_trailing_year("Pi"), ("Pi", None));
        assert_eq!(split_trailing_year("(500) Days of Summer"), ("(500) Days of Summer", None));
        assert_eq!(split_trailing_year("Shaft (IV)"), ("Shaft (IV)", None));
    }

    #[test]
    fn parses_films_grid() {
        let html = r#"
            <ul>
              <li class="griditem">
                <div class="react-component" data-item-slug="heat" data-item-name="Heat (1995)"></div>
                <p class="poster-viewingdata">
                  <span class="rating rated-9"></span>
                  <span class="like"></span>
                </p>
              </li>
              <li class="griditem">
                <div class="react-component" data-item-slug="pi" data-item-name="Pi"></div>
                <p class="poster-viewingdata"></p>
              </li>
            </ul>"#;
        let films = parse_films_page(html);
        assert_eq!(films.len(), 2);
        assert_eq!(films[0].slug, "heat");
        assert_eq!(films[0].name.as_deref(), Some("Heat"));
        assert_eq!(films[0].year, Some(1995));
        assert_eq!(films[0].rating, Some(4.5));
        assert!(films[0].liked);
        assert_eq!(films[1].slug, "pi");
        assert_eq!(films[1].rating, None);
        assert!(!films[1].liked);
    }

    #[test]
    fn parses_diary_rows() {
        let html = r#"
            <table>
              <tr class="diary-entry-row" data-viewing-id="v-1001">
                <td class="td-day"><a href="/someone/films/diary/for/2023/06/15/">15</a></td>
                <td class="td-film-details">
                  <div data-film-slug="heat" data-film-name="Heat"></div>
                </td>
                <td class="td-rating"><span class="rating rated-8"></span></td>
                <td class="td-rewatch icon-status-off"></td>
                <td class="td-like"><span class="icon-liked"></span></td>
              </tr>
              <tr class="diary-entry-row" data-viewing-id="v-1002">
                <td class="td-day"><a href="/someone/films/diary/for/2023/06/16/">16</a></td>
                <td class="td-film-details"><div data-film-slug="pi"></div></td>
                <td class="td-rating"><span class="rating"></span></td>
                <td class="td-rewatch"></td>
                <td class="td-like"></td>
              </tr>
            </table>"#;
        let entries = parse_diary_page(html);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].id, "v-1001");
        assert_eq!(entries[0].film_slug, "heat");
        assert_eq!(entries[0].film_name.as_deref(), Some("Heat"));
        assert_eq!(entries[0].watched_date, Date::new(2023, 6, 15).ok());
        assert_eq!(entries[0].rating, Some(4.0));
        assert!(!entries[0].rewatch);
        assert!(entries[0].liked);

        assert_eq!(entries[1].id, "v-1002");
        assert_eq!(entries[1].rating, None);
        assert!(entries[1].rewatch);
        assert!(!entries[1].liked);
    }

    #[test]
    fn parses_watchlist_grid() {
        let html = r#"
            <ul>
              <li class="griditem">
                <div class="react-component" data-item-slug="dune-part-two" data-item-name="Dune: Part Two (2024)"></div>
              </li>
            </ul>"#;
        let items = parse_watchlist_page(html);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "dune-part-two");
        assert_eq!(items[0].name.as_deref(), Some("Dune: Part Two"));
        assert_eq!(items[0].year, Some(2024));
    }

    #[test]
    fn empty_page_parses_to_no_items() {
        assert!(parse_films_page("<ul></ul>").is_empty());
        assert!(parse_diary_page("<table></table>").is_empty());
        assert!(parse_watchlist_page("<ul></ul>").is_empty());
    }

    #[test]
    fn parses_profile_page() {
        let html = r#"
            <body>
              <h1 class="person-display-name"><span class="displayname">Some One</span></h1>
              <div class="bio"><p>Watches too many films.</p></div>
              <div class="profile-metadata">
                <div class="metadatum -location"><span class="label">Berlin</span></div>
                <a class="url" href="https://example.com">example.com</a>
              </div>
              <section id="favourites">
                <div class="react-component" data-item-slug="heat"></div>
                <div class="react-component" data-item-slug="pi"></div>
              </section>
              <div class="profile-statistic">
                <span class="value">1,234</span><span class="definition">Films</span>
              </div>
              <div class="profile-statistic">
                <span class="value">56</span><span class="definition">This year</span>
              </div>
            </body>"#;
        let profile = parse_profile(html, "someone");
        assert_eq!(profile.username, "someone");
        assert_eq!(profile.display_name.as_deref(), Some("Some One"));
        assert_eq!(profile.bio.as_deref(), Some("Watches too many films."));
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
        assert_eq!(profile.website.as_deref(), Some("https://example.com"));
        assert_eq!(profile.favorites, vec!["heat", "pi"]);
        assert_eq!(profile.stats["films"], 1234);
        assert_eq!(profile.stats["this_year"], 56);
    }

    #[test]
    fn parses_film_detail_page() {
        let html = r#"
            <html>
            <head>
              <meta property="og:title" content="Heat (1995)">
              <meta property="og:description" content="Obsessive master thief Neil McCauley...">
              <meta property="og:image" content="https://img.example/heat.jpg">
              <meta property="og:url" content="https://letterboxd.com/film/heat/">
              <meta name="twitter:data2" content="4.28 out of 5">
            </head>
            <body data-tmdb-id="949">
              <h2 class="originalname">Heat</h2>
              <h4 class="tagline">A Los Angeles crime saga.</h4>
              <span class="directorlist"><a href="/director/michael-mann/">Michael Mann</a></span>
              <div id="tab-cast">
                <a class="text-slug" href="/actor/al-pacino/">Al Pacino</a>
                <a class="text-slug" href="/actor/robert-de-niro/">Robert De Niro</a>
              </div>
              <div id="tab-genres">
                <a class="text-slug" href="/films/genre/crime/">Crime</a>
                <a class="text-slug" href="/films/genre/drama/">Drama</a>
              </div>
              <div id="tab-details">
                <a href="/films/country/usa/">USA</a>
                <a href="/films/language/english/">English</a>
                <a href="/studio/regency-enterprises/">Regency Enterprises</a>
              </div>
              <a href="/writer/michael-mann/">Michael Mann</a>
              <p class="text-link text-footer">170 mins &nbsp; More at
                <a href="http://www.imdb.com/title/tt0113277/maindetails">IMDB</a>
              </p>
            </body>
            </html>"#;
        let detail = parse_film_detail(html, "heat").unwrap();
        assert_eq!(detail.title, "Heat");
        assert_eq!(detail.year, Some(1995));
        assert_eq!(detail.original_title.as_deref(), Some("Heat"));
        assert_eq!(detail.tagline.as_deref(), Some("A Los Angeles crime saga."));
        assert_eq!(detail.runtime_minutes, Some(170));
        assert_eq!(detail.genres, vec!["Crime", "Drama"]);
        assert_eq!(detail.directors, vec!["Michael Mann"]);
        assert_eq!(detail.cast, vec!["Al Pacino", "Robert De Niro"]);
        assert_eq!(detail.countries, vec!["USA"]);
        assert_eq!(detail.languages, vec!["English"]);
        assert_eq!(detail.studios, vec!["Regency Enterprises"]);
        assert_eq!(detail.average_rating, Some(4.28));
        assert_eq!(detail.tmdb_id, Some(949));
        assert_eq!(detail.imdb_id.as_deref(), Some("tt0113277"));
        let crew = detail.crew.unwrap();
        assert_eq!(crew["writer"][0], "Michael Mann");
    }

    #[test]
    fn film_detail_without_title_is_a_parse_error() {
        let err = parse_film_detail("<html><body></body></html>", "heat").unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[test]
    fn tmdb_id_from_link_fallback() {
        let html = r#"
            <html>
            <head><meta property="og:title" content="Heat (1995)"></head>
            <body>
              <a href="https://www.themoviedb.org/movie/949/">TMDB</a>
            </body>
            </html>"#;
        let detail = parse_film_detail(html, "heat").unwrap();
        assert_eq!(detail.tmdb_id, Some(949));
    }

    #[test]
    fn extracts_ids_from_urls() {
        assert_eq!(tmdb_id_from_url("https://www.themoviedb.org/movie/949/"), Some(949));
        assert_eq!(tmdb_id_from_url("https://www.themoviedb.org/tv/1396"), Some(1396));
        assert_eq!(tmdb_id_from_url("https://www.themoviedb.org/person/500"), None);
        assert_eq!(
            imdb_id_from_url("http://www.imdb.com/title/tt0113277/maindetails").as_deref(),
            Some("tt0113277")
        );
        assert_eq!(imdb_id_from_url("http://www.imdb.com/name/nm0000199/"), None);
    }

    #[test]
    fn parses_runtime_text() {
        assert_eq!(parse_runtime("170 mins More at IMDB TMDB"), Some(170));
        assert_eq!(parse_runtime("90 min"), Some(90));
        assert_eq!(parse_runtime("More at IMDB TMDB"), None);
    }
}
