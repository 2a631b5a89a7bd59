// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt templates sent to the generative model.
//!
//! Every template asks for bare JSON with a fixed schema; responses are
//! still run through the extractor since the model does not always comply.

use crate::models::CourseOutline;

/// Connectivity probe used by the diagnostics route.
pub const PING: &str = "Say \"Hello from Gemini!\" as plain text";

pub fn course_outline(topic: &str, module_count: u32, lesson_count: u32) -> String {
    format!(
        r#"You are an expert educational content creator. Create a comprehensive online course outline for the topic: "{topic}".

Requirements:
- Generate exactly {module_count} modules
- Each module should have exactly {lesson_count} lessons
- Course should progress from basics to advanced concepts
- Lessons should build on each other logically
- Use clear, descriptive titles

Return ONLY a valid JSON object with this exact structure (no markdown, no explanations):
{{
  "title": "Course title",
  "description": "2-3 sentence course description",
  "modules": [
    {{
      "title": "Module title",
      "description": "Module description",
      "lessons": ["Lesson 1 title", "Lesson 2 title"]
    }}
  ]
}}"#
    )
}

pub fn lesson_content(
    course_title: &str,
    module_title: &str,
    lesson_title: &str,
    previous_lessons: &[String],
) -> String {
    let context = if previous_lessons.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nPrevious lessons covered: {}\nBuild on these concepts without repeating them.",
            previous_lessons.join(", ")
        )
    };

    // The title is embedded in the example schema; keep it valid JSON.
    let title_json = serde_json::Value::String(lesson_title.to_string()).to_string();

    format!(
        r#"You are an expert instructor creating educational content for an online course.

Course: {course_title}
Module: {module_title}
Lesson: {lesson_title}{context}

Create comprehensive lesson content with the following requirements:

1. Start with 2-3 clear learning objectives
2. Structure content using these block types:
   - heading: Section headings (level 1, 2, or 3)
   - paragraph: Explanatory text (2-4 sentences each)
   - code: Code examples with language specified
   - list: Bullet points or numbered lists
   - video: YouTube search query for relevant video
   - mcq: Multiple choice question with 4 options

3. Include 2-3 code examples if relevant to the topic
4. Include 1 YouTube video suggestion
5. Include 2-3 MCQs to test understanding
6. Estimate lesson duration in minutes

Return ONLY valid JSON (no markdown, no explanations):
{{
  "title": {title_json},
  "objectives": ["objective 1", "objective 2", "objective 3"],
  "estimatedMinutes": 15,
  "content": [
    {{ "type": "heading", "text": "Introduction", "level": 1 }},
    {{ "type": "paragraph", "text": "Lesson introduction..." }},
    {{ "type": "code", "language": "javascript", "text": "console.log('example');" }},
    {{ "type": "list", "items": ["Point 1", "Point 2"], "ordered": false }},
    {{ "type": "video", "query": "Relevant YouTube search query" }},
    {{ "type": "mcq", "question": "What is X?", "options": [
      {{ "text": "Option A", "isCorrect": false }},
      {{ "text": "Option B", "isCorrect": true }},
      {{ "text": "Option C", "isCorrect": false }},
      {{ "text": "Option D", "isCorrect": false }}
    ], "explanation": "Why B is correct..." }}
  ]
}}"#
    )
}

pub fn translate_outline(outline: &CourseOutline, language_name: &str) -> anyhow::Result<String> {
    let outline_json = serde_json::to_string_pretty(outline)?;

    Ok(format!(
        r#"You are a professional translator for educational content. Translate the following course outline into {language_name}.

Rules:
- Translate every title, description and lesson title
- Keep exactly the same number of modules, in the same order
- Keep exactly the same number of lessons in each module, in the same order
- Do not add, remove, merge or split anything
- Keep technical terms that are normally left untranslated

Course outline:
{outline_json}

Return ONLY a valid JSON object with the same structure (no markdown, no explanations)."#
    ))
}
