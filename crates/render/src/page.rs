use domain::{CommentForm, FieldError, FormField, Post, SubmissionState};
use storage::ImageUrls;

use crate::escape::html_escape;
use crate::rich_text::BlockRegistry;

/// How the comment section of a page should look.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormView<'a> {
    pub state: SubmissionState,
    pub errors: &'a [FieldError],
    /// Values to put back into the inputs after a rejected submit.
    pub values: Option<&'a CommentForm>,
}

impl<'a> FormView<'a> {
    pub fn submitted() -> Self {
        Self {
            state: SubmissionState::Submitted,
            ..Default::default()
        }
    }

    pub fn rejected(errors: &'a [FieldError], values: &'a CommentForm) -> Self {
        Self {
            state: SubmissionState::AwaitingSubmission,
            errors,
            values: Some(values),
        }
    }
}

pub struct PageRenderer {
    registry: BlockRegistry,
    images: ImageUrls,
    site_title: String,
}

impl PageRenderer {
    pub fn new(registry: BlockRegistry, images: ImageUrls, site_title: impl Into<String>) -> Self {
        Self {
            registry,
            images,
            site_title: site_title.into(),
        }
    }

    pub fn render_post(&self, post: &Post, form: &FormView<'_>) -> String {
        let mut body = String::with_capacity(4096);
        body.push_str(&self.header());

        if let Some(src) = post.main_image.as_ref().and_then(|i| self.images.url_for(i)) {
            body.push_str(&format!(
                r#"<img src="{}" class="h-40 w-full object-cover" alt=""/>"#,
                html_escape(&src)
            ));
        }

        body.push_str(r#"<article class="mx-auto max-w-3xl p-5">"#);
        body.push_str(&format!(
            r#"<h1 class="mt-10 mb-3 text-3xl">{}</h1>"#,
            html_escape(&post.title)
        ));
        body.push_str(&format!(
            r#"<h2 class="mb-2 text-xl font-light text-gray-500">{}</h2>"#,
            html_escape(&post.description)
        ));
        body.push_str(&self.byline(post));
        body.push_str(r#"<div class="mt-10">"#);
        body.push_str(&self.registry.render(&post.body, &self.images));
        body.push_str("</div></article>");
        body.push_str(r#"<hr class="my-5 mx-auto max-w-lg border border-yellow-500"/>"#);

        if form.state.shows_form() {
            body.push_str(&comment_form(post, form));
        } else {
            body.push_str(ACKNOWLEDGMENT);
        }

        body.push_str(&comments(post));
        self.document(&post.title, &body)
    }

    pub fn render_not_found(&self) -> String {
        let body = format!(
            r#"{}<div class="mx-auto max-w-3xl p-5"><h1 class="text-3xl">404</h1><p>This page could not be found.</p></div>"#,
            self.header()
        );
        self.document("404: This page could not be found", &body)
    }

    fn header(&self) -> String {
        format!(
            r#"<header class="mx-auto flex max-w-7xl justify-between p-5"><a href="/">{}</a></header>"#,
            html_escape(&self.site_title)
        )
    }

    fn byline(&self, post: &Post) -> String {
        let avatar = post
            .author
            .image
            .as_ref()
            .and_then(|i| self.images.url_for(i))
            .map(|src| {
                format!(
                    r#"<img src="{}" class="h-10 w-10 rounded-full" alt=""/>"#,
                    html_escape(&src)
                )
            })
            .unwrap_or_default();
        let published = post.created_at.format("%-m/%-d/%Y, %-I:%M:%S %p");

        format!(
            r#"<div class="flex items-center space-x-2">{}<p class="text-sm font-extralight">Blog post by <span class="font-normal text-green-600">{}</span> - published on {}</p></div>"#,
            avatar,
            html_escape(&post.author.name),
            published
        )
    }

    fn document(&self, title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"/><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/><title>{} | {}</title></head><body><main>{}</main></body></html>",
            html_escape(title),
            html_escape(&self.site_title),
            body
        )
    }
}

const ACKNOWLEDGMENT: &str = concat!(
    r#"<div class="my-10 mx-auto flex max-w-2xl flex-col rounded-lg border border-gray-500 bg-yellow-500 p-10 text-center text-white">"#,
    r#"<h3 class="text-2xl font-bold">Thank you for submitting your comment!</h3>"#,
    r#"<p class="mt-2 text-lg text-gray-500">Once it has been approved, it will appear below!</p>"#,
    "</div>"
);

fn comment_form(post: &Post, form: &FormView<'_>) -> String {
    let value = |field: FormField| {
        form.values
            .map(|v| html_escape(v.value(field)))
            .unwrap_or_default()
    };

    let mut html = format!(
        r#"<form method="post" action="/post/{}" class="mx-auto mb-10 flex max-w-2xl flex-col p-5">"#,
        html_escape(&post.slug.current)
    );
    html.push_str(r#"<h3 class="text-sm text-yellow-500">Enjoyed this article?</h3>"#);
    html.push_str(r#"<h4 class="text-3xl font-bold">Leave a comment below!</h4>"#);
    html.push_str(r#"<hr class="mt-2 py-3"/>"#);
    html.push_str(&format!(
        r#"<input type="hidden" name="_id" value="{}"/>"#,
        html_escape(&post.id)
    ));
    html.push_str(&format!(
        r#"<label class="mb-5 block"><span class="text-gray-700">Name</span><input name="name" type="text" placeholder="Enter your name" required value="{}"/></label>"#,
        value(FormField::Name)
    ));
    html.push_str(&format!(
        r#"<label class="mb-5 block"><span class="text-gray-700">Email</span><input name="email" type="email" placeholder="Enter your Email" required value="{}"/></label>"#,
        value(FormField::Email)
    ));
    html.push_str(&format!(
        r#"<label class="mb-5 block"><span class="text-gray-700">Comment</span><textarea name="comment" placeholder="Comment...." rows="8" required>{}</textarea></label>"#,
        value(FormField::Comment)
    ));

    html.push_str(r#"<div class="flex flex-col p-5">"#);
    for error in form.errors {
        html.push_str(&format!(
            r#"<span class="text-red-500" data-field="{}">{}</span>"#,
            error.field.name(),
            error
        ));
    }
    html.push_str("</div>");
    html.push_str(r#"<input type="submit" value="Submit"/>"#);
    html.push_str("</form>");
    html
}

fn comments(post: &Post) -> String {
    let mut html = String::from(
        r#"<div class="my-10 mx-auto flex max-w-2xl flex-col space-y-2 rounded-lg p-10 shadow-md shadow-yellow-500"><h3 class="mb-5 text-4xl font-light">Comments</h3><hr class="pb-2"/>"#,
    );
    for comment in &post.comments {
        html.push_str(&format!(
            r#"<div class="comment" id="comment-{}"><p><span class="text-yellow-600">{}</span>: {}</p></div>"#,
            html_escape(&comment.id),
            html_escape(&comment.name),
            html_escape(&comment.comment)
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Author, Comment, Reference, SlugField};
    use storage::CmsConfig;

    fn renderer() -> PageRenderer {
        PageRenderer::new(
            BlockRegistry::post_body(),
            ImageUrls::new(&CmsConfig::new("proj", "production")),
            "Medium Blog",
        )
    }

    fn hello_world() -> Post {
        let comment = |id: &str, name: &str| Comment {
            id: id.into(),
            post: Reference {
                id: "post-1".into(),
            },
            name: name.into(),
            email: Some("hidden@example.com".into()),
            comment: format!("{} says hi", name),
            approved: true,
        };
        Post {
            id: "post-1".into(),
            created_at: "2022-03-01T15:04:05Z".parse().unwrap(),
            title: "Hello World".into(),
            description: "A first post".into(),
            main_image: Some(domain::ImageRef {
                asset: Reference {
                    id: "image-abc-800x600-jpg".into(),
                },
                alt: None,
            }),
            slug: SlugField {
                current: "hello-world".into(),
            },
            body: serde_json::from_value(serde_json::json!([
                { "_type": "block", "style": "normal", "children": [{ "text": "Body text" }] }
            ]))
            .unwrap(),
            author: Author {
                name: "Ada".into(),
                image: None,
            },
            comments: vec![comment("c1", "Bob"), comment("c2", "Eve")],
        }
    }

    #[test]
    fn renders_post_with_two_comments() {
        let html = renderer().render_post(&hello_world(), &FormView::default());

        assert!(html.contains("<title>Hello World | Medium Blog</title>"));
        assert!(html.contains(r#"<h1 class="mt-10 mb-3 text-3xl">Hello World</h1>"#));
        assert!(html.contains("Body text"));
        assert!(html.contains("published on 3/1/2022, 3:04:05 PM"));
        assert!(html
            .contains("https://cdn.sanity.io/images/proj/production/abc-800x600.jpg"));
        assert_eq!(html.matches(r#"class="comment""#).count(), 2);
        assert!(!html.contains("hidden@example.com"));
    }

    #[test]
    fn awaiting_state_renders_form_with_hidden_post_id() {
        let html = renderer().render_post(&hello_world(), &FormView::default());
        assert!(html.contains(r#"<input type="hidden" name="_id" value="post-1"/>"#));
        assert!(html.contains(r#"action="/post/hello-world""#));
        assert!(!html.contains("Thank you for submitting your comment!"));
    }

    #[test]
    fn rejected_form_shows_one_message_per_field() {
        let values = CommentForm {
            post_id: "post-1".into(),
            name: "Ada <3".into(),
            ..Default::default()
        };
        let errors = values.validate().unwrap_err();
        let html = renderer().render_post(&hello_world(), &FormView::rejected(&errors, &values));

        assert_eq!(html.matches(r#"class="text-red-500""#).count(), 2);
        assert!(html.contains("Email is required"));
        assert!(html.contains("Comment is required"));
        assert!(!html.contains("Name is required"));
        assert!(html.contains(r#"value="Ada &lt;3""#));
    }

    #[test]
    fn submitted_state_hides_form() {
        let html = renderer().render_post(&hello_world(), &FormView::submitted());
        assert!(html.contains("Thank you for submitting your comment!"));
        assert!(!html.contains("<form"));
        assert_eq!(html.matches(r#"class="comment""#).count(), 2);
    }

    #[test]
    fn escapes_user_content() {
        let mut post = hello_world();
        post.comments[0].comment = "<script>alert(1)</script>".into();
        let html = renderer().render_post(&post, &FormView::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn not_found_page() {
        let html = renderer().render_not_found();
        assert!(html.contains("This page could not be found."));
        assert_eq!(html.matches("<main").count(), 1);
    }
}
