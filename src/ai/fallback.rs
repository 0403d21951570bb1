//! Built-in text used when no provider can serve a request.

/// Body paragraph count for a requested article length.
fn paragraphs_for(length: &str) -> usize {
    match length {
        "short" => 3,
        "long" => 8,
        _ => 5,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Template article with a header image, intro, body and conclusion.
pub fn blog_article(topic: &str, length: &str) -> String {
    let intro = format!(
        "{} has become an important subject in the modern world. \
         In this article, we will explore the key ideas, why it matters, and how you can start using it in practice.",
        capitalize(topic)
    );

    let body_points = [
        format!(
            "First, it is useful to understand the basic definition of {topic}. \
             At a high level, it describes a collection of concepts, tools, and practices that help us solve real problems."
        ),
        format!(
            "Another important part of {topic} is how it is used in day-to-day life. \
             Many people interact with it without even noticing, through apps, websites, and the services they rely on."
        ),
        format!(
            "When learning about {topic}, it is helpful to start small. \
             Focus on a few core ideas, try tiny experiments, and build confidence step by step."
        ),
        format!(
            "In addition, {topic} is always changing. New techniques, frameworks, and tools appear frequently, \
             so staying curious and reading a little each week can make a big difference."
        ),
        format!(
            "Finally, it is worth remembering that {topic} is not only about technology, but also about people. \
             Clear communication, responsible usage, and good documentation are just as important as any technical skill."
        ),
    ];

    let paragraphs = paragraphs_for(length);
    let take = if paragraphs > 2 { paragraphs - 2 } else { 1 };
    let body = body_points[..take.min(body_points.len())].join("\n\n");

    let conclusion = format!(
        "In summary, {topic} is a broad area with many opportunities to learn and create. \
         By taking time to understand the basics and practising regularly, you can turn ideas into working projects \
         and stay prepared for future developments."
    );

    let image_url = format!(
        "https://source.unsplash.com/1600x900/?{}",
        topic.replace(' ', ",")
    );

    format!("![{topic}]({image_url})\n\n# {topic}\n\n{intro}\n\n{body}\n\n{conclusion}")
}

/// First three sentences, with an ellipsis when more were dropped.
pub fn summary(text: &str) -> String {
    let flattened = text.replace('\n', " ");
    let sentences: Vec<&str> = flattened
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut summary = sentences.iter().take(3).copied().collect::<Vec<_>>().join(". ");
    if sentences.len() > 3 {
        summary.push_str("...");
    }
    summary
}

pub fn headlines(subject: &str) -> Vec<String> {
    vec![
        format!("Everything You Need to Know About {subject}"),
        format!("Getting Started with {subject}"),
        format!("Practical Guide: How to Use {subject} in Real Life"),
        format!("{subject}: Key Concepts and Simple Examples"),
        format!("Why {subject} Matters More Than Ever Today"),
    ]
}
