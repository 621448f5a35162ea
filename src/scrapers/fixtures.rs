//! Canned pages and an in-memory [`PageSource`] for tests.

use crate::error::ScrapeError;
use crate::fetch::PageSource;
use std::cell::RefCell;
use std::collections::HashMap;

pub const ROOT_URL: &str = "https://www.blogdumoderateur.com/";
pub const LISTING_URL: &str = "https://www.blogdumoderateur.com/ia/";
pub const ARTICLE_URL: &str = "https://www.blogdumoderateur.com/chatgpt-5-nouveautes/";
pub const MISSING_URL: &str = "https://www.blogdumoderateur.com/page-introuvable/";

pub const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="fr"><head><title>ChatGPT</title></head><body>
<article class="post-101 post type-post status-publish">
  <header class="entry-header">
    <h1 class="entry-title">ChatGPT : 5 nouveautés   à connaître</h1>
    <div class="meta-info">
      <span class="byline">Par <a href="/auteur/jane-doe/"> Jane Doe </a></span>
      <span class="posted-on">Publié le <time class="entry-date published" datetime="2023-05-01T10:00:00+02:00">1 mai 2023</time></span>
    </div>
  </header>
  <figure class="article-header-image">
    <img src="data:image/svg+xml;base64,PHN2Zz4=" data-lazy-src="https://cdn.example.com/hero.jpg" alt="Illustration">
  </figure>
  <div class="article-hat"><p>OpenAI déploie une série de fonctionnalités.</p><p>Deuxième paragraphe.</p></div>
  <div class="entry-content">
    <p>Introduction.</p>
    <figure class="wp-block-image">
      <img src="data:image/svg+xml;base64,PHN2Zz4=" data-lazy-src="https://cdn.example.com/figure-1.jpg" alt="Alt ignoré">
      <figcaption>Capture d'écran de l'interface</figcaption>
    </figure>
    <p><img src="https://cdn.example.com/bare.jpg" alt="Image hors figure"></p>
    <figure class="wp-block-image"><img src="https://cdn.example.com/figure-2.jpg" alt="Alt du second"></figure>
    <figure class="wp-block-image"><img src="data:image/png;base64,iVBORw0KGgo="></figure>
    <figure class="wp-block-embed"><p>Vidéo intégrée</p></figure>
  </div>
  <div class="social-content">
    <div class="meta-info"><span class="byline"><a href="/auteur/autre/">Social Person</a></span></div>
  </div>
  <div class="article-terms">
    <ul class="tags-list">
      <li><a class="post-tags" href="/ia/">IA</a></li>
      <li><a class="post-tags" href="/outils/">Outils</a></li>
    </ul>
  </div>
</article>
</body></html>"#;

/// An article page whose header container is missing entirely.
pub const HEADERLESS_PAGE: &str = r#"<html><body>
<div class="social-content">
  <div class="meta-info"><span class="byline"><a href="/auteur/s/">Social Only</a></span></div>
</div>
<div class="entry-content">
  <img src="https://cdn.example.com/raw.png" alt="Brut">
</div>
<div class="article-terms"><ul class="tags-list"><li><a class="post-tags">Réseaux sociaux</a></li></ul></div>
</body></html>"#;

pub const LISTING_PAGE: &str = r#"<html><body><main>
<article class="post-101 post type-post">
  <div class="post-thumbnail picture rounded-img">
    <img src="data:image/svg+xml;base64,PHN2Zz4=" data-lazy-src="https://cdn.example.com/thumb-101.jpg">
  </div>
  <div class="entry-meta">
    <span class="favtag color-b">Intelligence artificielle</span>
    <span class="posted-on"><time class="published" datetime="2023-05-01T08:00:00">1 mai 2023</time></span>
    <header class="entry-header pt-1">
      <a href="https://www.blogdumoderateur.com/chatgpt-5-nouveautes/"><h3 class="entry-title">ChatGPT, aperçu</h3></a>
    </header>
  </div>
</article>
<article class="post-202 post type-post">
  <div class="post-thumbnail"><img src="https://cdn.example.com/thumb-202.jpg"></div>
  <div class="entry-meta">
    <span class="favtag">Web</span>
    <time class="published" datetime="2023-04-28 09:30:00">28 avril 2023</time>
    <header class="entry-header">
      <a href="https://www.blogdumoderateur.com/page-introuvable/"><h3 class="entry-title">Article sans page</h3></a>
    </header>
  </div>
</article>
<article class="post-303 post">
  <div class="entry-meta"><header class="entry-header"><span>Sans lien</span></header></div>
</article>
<article class="sticky-banner">
  <header class="entry-header"><a href="https://www.blogdumoderateur.com/pub/"><h3 class="entry-title">Publicité</h3></a></header>
</article>
</main></body></html>"#;

pub const HOME_PAGE: &str = r#"<html><body>
<nav class="main-navigation">
  <ul id="menu-main-menu" class="menu">
    <li class="menu-item menu-item-object-category"><a href="https://www.blogdumoderateur.com/web/">Web</a>
      <ul class="sub-menu">
        <li class="menu-item menu-item-object-category"><a href="/web/seo/">SEO</a></li>
      </ul>
    </li>
    <li class="menu-item menu-item-object-category"><a href="/social/">Social</a></li>
    <li class="menu-item menu-item-object-category"><a href="/web/">Web (doublon)</a></li>
    <li class="menu-item menu-item-object-page"><a href="/a-propos/">À propos</a></li>
    <li class="menu-item menu-item-object-category"><a href="/tools/">Outils</a></li>
    <li class="menu-item menu-item-object-category"><a href="/">Accueil</a></li>
  </ul>
</nav>
</body></html>"#;

/// A menu without category-typed items.
pub const FLAT_MENU_PAGE: &str = r#"<html><body>
<ul id="menu-main-menu">
  <li class="menu-item"><a href="ia/">IA</a></li>
  <li class="menu-item"><span><a href="https://www.blogdumoderateur.com/marketing/">Marketing</a></span></li>
  <li class="menu-item"><a href="/tools/generateur/">Générateur</a></li>
  <li class="menu-item"><a>Sans href</a></li>
</ul>
</body></html>"#;

/// URL → markup map standing in for the network. Unknown URLs fail like a 404.
/// Every requested URL is recorded in order.
#[derive(Debug, Default)]
pub struct FixtureSource {
    pages: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl FixtureSource {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn site() -> Self {
        Self::new(&[
            (ROOT_URL, HOME_PAGE),
            (LISTING_URL, LISTING_PAGE),
            (ARTICLE_URL, ARTICLE_PAGE),
        ])
    }
}

impl PageSource for FixtureSource {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}
