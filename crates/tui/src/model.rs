//! Menu content shown by the terminal front-end.
//!
//! The navigator only knows counts. This model keeps the text behind those
//! counts (icons, labels, sub-item titles, blog posts) and converts itself
//! into a [`MenuCollection`] whenever the navigator is built or reloaded.

use xmb_engine::{EngineError, MenuCollection};
use xmb_util::{BlogPost, MenuItemConfig, XmbConfig};

/// One row of a sub-menu column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntry {
    pub title: String,
    pub description: Option<String>,
    /// Index into [`MenuModel::posts`] when the entry opens a blog post.
    pub post: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub icon: String,
    pub label: String,
    pub sub_items: Vec<SubEntry>,
    /// Static sub-items restored when the blog turns out empty.
    fallback: Vec<SubEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuModel {
    pub items: Vec<MenuEntry>,
    pub posts: Vec<BlogPost>,
    /// Item whose sub-items are replaced by blog posts.
    blog_index: Option<usize>,
}

impl MenuEntry {
    fn from_config(config: &MenuItemConfig) -> Self {
        let sub_items: Vec<SubEntry> = config
            .sub_items
            .iter()
            .flatten()
            .map(|item| SubEntry {
                title: item.title.clone(),
                description: item.description.clone(),
                post: None,
            })
            .collect();
        Self {
            icon: config.icon.clone(),
            label: config.label.clone(),
            fallback: sub_items.clone(),
            sub_items,
        }
    }
}

impl MenuModel {
    pub fn from_config(config: &XmbConfig) -> Self {
        Self {
            items: config.menu.iter().map(MenuEntry::from_config).collect(),
            posts: Vec::new(),
            blog_index: config.blog_item_index(),
        }
    }

    /// Replace the blog item's sub-items with one entry per post.
    ///
    /// With no posts the blog item goes back to its configured entries.
    pub fn apply_posts(&mut self, posts: Vec<BlogPost>) {
        let Some(blog) = self.blog_index.and_then(|index| self.items.get_mut(index)) else {
            self.posts = posts;
            return;
        };

        blog.sub_items = if posts.is_empty() {
            blog.fallback.clone()
        } else {
            posts
                .iter()
                .enumerate()
                .map(|(index, post)| SubEntry {
                    title: post.title.clone(),
                    description: Some(post_summary(post)),
                    post: Some(index),
                })
                .collect()
        };
        self.posts = posts;
    }

    /// Counts-only view for the navigator. Empty columns become the sentinel.
    pub fn collection(&self) -> Result<MenuCollection, EngineError> {
        MenuCollection::from_counts(
            self.items
                .iter()
                .map(|item| (!item.sub_items.is_empty()).then_some(item.sub_items.len())),
        )
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sub_entry(&self, menu_index: usize, sub_index: usize) -> Option<&SubEntry> {
        self.items.get(menu_index)?.sub_items.get(sub_index)
    }

    pub fn post_for(&self, menu_index: usize, sub_index: usize) -> Option<&BlogPost> {
        let post = self.sub_entry(menu_index, sub_index)?.post?;
        self.posts.get(post)
    }
}

fn post_summary(post: &BlogPost) -> String {
    if post.excerpt.is_empty() {
        post.date.clone()
    } else {
        format!("{} · {}", post.date, post.excerpt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmb_types::SubMenu;

    fn post(title: &str, date: &str) -> BlogPost {
        BlogPost::from_markdown(format!("{title}.md"), &format!("---\ntitle: {title}\ndate: {date}\n---\nbody"))
    }

    #[test]
    fn default_config_maps_to_counts() {
        let model = MenuModel::from_config(&XmbConfig::default());
        let collection = model.collection().expect("collection");
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.get(0), Some(&SubMenu::HasSubItems { count: 3, active_index: 0 }));
        assert_eq!(collection.get(3), Some(&SubMenu::NoSubItems));
    }

    #[test]
    fn posts_replace_blog_entries_and_empty_restores_fallback() {
        let mut model = MenuModel::from_config(&XmbConfig::default());
        model.apply_posts(vec![post("New", "2024-03-05"), post("Old", "2024-01-15")]);

        let titles: Vec<_> = model.items[2].sub_items.iter().map(|entry| entry.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);
        assert_eq!(model.post_for(2, 1).map(|post| post.title.as_str()), Some("Old"));
        assert!(model.post_for(0, 0).is_none());

        model.apply_posts(Vec::new());
        assert_eq!(model.items[2].sub_items.len(), 1);
        assert_eq!(model.items[2].sub_items[0].title, "No posts yet");
        assert!(model.posts.is_empty());
    }
}
