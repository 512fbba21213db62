//! Terminal rendering of listings and records

use cinedeck_core::{ListingSnapshot, ResultPage};
use cinedeck_search::{
    AggregationState, MediaDetails, PaginationMode, PersonProfile, SearchResultItem,
    trailer_watch_url,
};

/// One-line summary of a result item.
pub fn format_item(item: &SearchResultItem) -> String {
    let mut line = format!("[{:<6}] {}", item.kind.as_str(), item.title);
    if item.kind.is_title() {
        line.push_str(&format!(" ({})", item.release_year));
    }
    if let Some(rating) = item.rating {
        line.push_str(&format!("  * {rating:.1}"));
    }
    line.push_str(&format!("  #{}", item.id));
    line
}

fn format_footer(page: u32, total_pages: u32, total_results: u64) -> String {
    format!("page {page} of {total_pages} ({total_results} results)")
}

pub fn print_page(page: &ResultPage<SearchResultItem>) {
    if page.is_empty() {
        println!("No results.");
    }
    for item in &page.items {
        println!("  {}", format_item(item));
    }
    println!("{}", format_footer(page.page, page.total_pages, page.total_results));
}

pub fn print_search(state: &AggregationState) {
    if let (PaginationMode::Client, Some(person)) = (state.mode, state.expanded_person) {
        println!("Including credits of person #{person}");
    }
    if state.items.is_empty() {
        println!("No results.");
    }
    for item in &state.items {
        println!("  {}", format_item(item));
    }
    println!(
        "{}",
        format_footer(state.page, state.total_pages, state.total_results)
    );
}

/// Lines shown for a browse snapshot. A failed search reads as an empty
/// result, tagged with its error code.
pub fn snapshot_lines(snapshot: &ListingSnapshot<SearchResultItem>) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.items.len() + 2);
    match (&snapshot.last_error, snapshot.items.is_empty()) {
        (Some(code), _) => lines.push(format!("No results. ({code})")),
        (None, true) => lines.push("No results.".to_string()),
        (None, false) => {}
    }
    lines.extend(snapshot.items.iter().map(|item| format!("  {}", format_item(item))));
    lines.push(format_footer(
        snapshot.page,
        snapshot.total_pages,
        snapshot.total_results,
    ));
    lines
}

pub fn print_snapshot(snapshot: &ListingSnapshot<SearchResultItem>) {
    for line in snapshot_lines(snapshot) {
        println!("{line}");
    }
}

pub fn print_details(details: &MediaDetails) {
    println!("{} ({})", details.title, details.release_year);
    if let Some(tagline) = &details.tagline {
        println!("  \"{tagline}\"");
    }
    if !details.genres.is_empty() {
        println!("  Genres: {}", details.genres.join(", "));
    }
    if let Some(rating) = details.rating {
        println!("  Rating: {rating:.1}");
    }
    if let Some(runtime) = details.runtime_minutes {
        println!("  Runtime: {runtime} min");
    }
    if let Some(seasons) = details.number_of_seasons {
        println!("  Seasons: {seasons}");
    }
    if let Some(overview) = &details.overview {
        println!("\n{overview}\n");
    }
    for member in details.cast.iter().take(10) {
        match &member.character {
            Some(character) => println!("  {} as {character}", member.name),
            None => println!("  {}", member.name),
        }
    }
    if let Some(trailer) = details.trailer() {
        println!("Trailer: {}", trailer_watch_url(&trailer.key));
    }
}

pub fn print_person(profile: &PersonProfile) {
    let details = &profile.details;
    println!("{}", details.name);
    if let Some(department) = &details.known_for_department {
        println!("  Known for: {department}");
    }
    if let Some(birthday) = &details.birthday {
        match &details.place_of_birth {
            Some(place) => println!("  Born: {birthday} in {place}"),
            None => println!("  Born: {birthday}"),
        }
    }
    if let Some(biography) = details.biography.as_deref().filter(|b| !b.is_empty()) {
        println!("\n{biography}\n");
    }
    for item in &profile.known_for {
        println!("  {}", format_item(item));
    }
}
