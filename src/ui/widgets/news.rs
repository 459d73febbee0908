//! News feed and article screens.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::common::{bordered, refresh_marker, render_placeholder};
use crate::format::{format_datetime, format_time_ago, truncate};
use crate::markup::{self, Block as MarkupBlock};
use crate::views::{NewsDetail, NewsFeed};

pub struct NewsFeedWidget;

impl NewsFeedWidget {
    pub fn render(frame: &mut Frame, area: Rect, feed: &NewsFeed, editing: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        Self::render_search_box(frame, chunks[0], feed, editing);
        Self::render_list(frame, chunks[1], feed);
    }

    fn render_search_box(frame: &mut Frame, area: Rect, feed: &NewsFeed, editing: bool) {
        let line = if editing {
            Line::from(vec![
                Span::raw(feed.draft().to_string()),
                Span::styled("█", Style::default().fg(Color::Yellow)),
            ])
        } else if let Some(term) = feed.active_search() {
            Line::from(vec![
                Span::styled(format!("\"{term}\""), Style::default().fg(Color::Yellow)),
                Span::styled("  (Esc to clear)", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(Span::styled(
                "Press / to search articles",
                Style::default().fg(Color::DarkGray),
            ))
        };

        let border = if editing { Color::Yellow } else { Color::Cyan };
        let block = bordered("Search").border_style(Style::default().fg(border));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_list(frame: &mut Frame, area: Rect, feed: &NewsFeed) {
        let selected = feed.selected_index();
        let state = feed.state();
        let view = state.view();
        let title = format!("News  {}{}", feed.pager().label(), refresh_marker(&view));
        let block = bordered(title);
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(page) = state.data() else {
            return;
        };

        if page.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No articles found",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let now = Utc::now();
        let width = usize::from(area.width.saturating_sub(6));
        let items: Vec<ListItem> = page
            .content
            .iter()
            .map(|article| {
                let meta = format!(
                    "{}  {}  {}",
                    format_time_ago(article.published_at, now),
                    article.source.as_deref().unwrap_or_default(),
                    article.related_crypto_symbols.join(" ")
                );
                ListItem::new(vec![
                    Line::from(Span::styled(
                        truncate(&article.title, width),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

pub struct NewsDetailWidget;

impl NewsDetailWidget {
    pub fn render(frame: &mut Frame, area: Rect, detail: &NewsDetail) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(7)])
            .split(area);

        Self::render_article(frame, chunks[0], detail);
        Self::render_related(frame, chunks[1], detail);
    }

    fn render_article(frame: &mut Frame, area: Rect, detail: &NewsDetail) {
        let state = detail.state();
        let view = state.view();
        let block = bordered(format!("Article{}", refresh_marker(&view)));
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(article) = state.data() else {
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                article.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{}  {}  {}",
                    format_datetime(article.published_at),
                    article.source.as_deref().unwrap_or_default(),
                    article.author.as_deref().unwrap_or_default()
                ),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if !article.related_crypto_symbols.is_empty() {
            lines.push(Line::from(Span::styled(
                article.related_crypto_symbols.join(" "),
                Style::default().fg(Color::Magenta),
            )));
        }
        lines.push(Line::from(""));
        drop(state);

        let body = detail.body();
        lines.extend(markup::parse(&body).into_iter().map(block_line));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((detail.scroll(), 0));
        frame.render_widget(paragraph, area);
    }

    fn render_related(frame: &mut Frame, area: Rect, detail: &NewsDetail) {
        let state = detail.related();
        let view = state.view();
        let block = bordered("More News");
        if !render_placeholder(frame, area, block.clone(), &view) {
            return;
        }
        let Some(articles) = state.data() else {
            return;
        };

        let now = Utc::now();
        let width = usize::from(area.width.saturating_sub(14));
        let items: Vec<ListItem> = articles
            .iter()
            .map(|article| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>9} ", format_time_ago(article.published_at, now)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(truncate(&article.title, width)),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn block_line(block: MarkupBlock<'_>) -> Line<'static> {
    let text = block.text().to_string();
    match block {
        MarkupBlock::Heading2(_) => Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        MarkupBlock::Heading3(_) => Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        MarkupBlock::Quote(_) => Line::from(vec![
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            Span::styled(text, Style::default().add_modifier(Modifier::ITALIC)),
        ]),
        MarkupBlock::ListItem(_) => Line::from(vec![Span::raw("  • "), Span::raw(text)]),
        MarkupBlock::Paragraph(_) => Line::from(text),
    }
}
