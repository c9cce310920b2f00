// Prompt templates and fallback payloads for the coaching agents.
// Templates use `{placeholder}` markers replaced by each agent's `build_prompt`.
// Reuses the grounding fragment from llm_client::prompts.

/// Interview agent prompt.
/// Replace: {organization}, {role}, {name}, {years}, {current_role}, {skills},
///          {experience}, {grounding_instruction}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"You are a senior interviewer at {organization}.
Generate a comprehensive set of interview questions for the {role} position, based on the candidate profile below.

CANDIDATE:
- Name: {name}
- Experience: {years} years
- Current role: {current_role}

SKILLS:
{skills}

RECENT EXPERIENCE:
{experience}

{grounding_instruction}

QUESTION TYPES TO GENERATE:
1. Experience verification (2 questions)
2. Technical depth (2 questions)
3. Problem solving (2 questions)
4. Project experience (2 questions)
5. Growth potential (1 question)

For each question include:
- "question": the question itself
- "intent": what the question evaluates
- "keywords": keywords a strong answer should contain
- "followup": a suggested follow-up question

Return a JSON object: {"questions": [ ... ]}"#;

/// Technical agent prompt.
/// Replace: {difficulty}, {role}, {skills}, {grounding_instruction}
pub const TECHNICAL_PROMPT_TEMPLATE: &str = r#"You are a technical interview specialist.
Generate in-depth technical questions for a {difficulty} {role} candidate.

CANDIDATE SKILLS:
{skills}

{grounding_instruction}

QUESTION CATEGORIES:
1. Algorithms & data structures (2 problems)
   - difficulty: {difficulty}
   - closely tied to day-to-day work
2. System design (2 problems)
   - consider scalability, performance and reliability
   - use a real-world service as the example
3. Code review (1 problem)
   - find the bug or propose improvements
   - include an actual code snippet
4. Technical depth (3 problems)
   - about the candidate's own stack
   - internals and how things work underneath
   - troubleshooting experience

For each problem include: "question", "difficulty" (1-5), "time_minutes",
"evaluation_points", "key_concepts", and an optional "hint".

Return a JSON object: {"questions": [ ... ]}"#;

/// Behavioral agent prompt.
/// Replace: {organization}, {seniority}, {role}, {name}, {years}, {current_role},
///          {experience}, {grounding_instruction}
pub const BEHAVIORAL_PROMPT_TEMPLATE: &str = r#"You are a people partner and behavioral interview specialist at {organization}.
Generate behavioral interview questions for a {seniority} {role} candidate.

CANDIDATE:
- Name: {name}
- Experience: {years} years
- Current role: {current_role}

BACKGROUND:
{experience}

{grounding_instruction}

QUESTION CATEGORIES:
1. Leadership & teamwork (3 questions): collaboration, conflict resolution, mentoring
2. Problem solving & decision making (3 questions): hard situations, prioritization, risk
3. Communication (2 questions): stakeholders, explaining technical topics, feedback
4. Growth mindset (2 questions): failure and learning, self-development, career goals
5. Culture fit (2 questions): ways of working, values, contribution

Every question must be answerable in STAR (Situation, Task, Action, Result) form.
For each question include: "question", "competency", "good_answer_traits",
"red_flags", "followup".

Return a JSON object: {"behavioral_questions": [ ... ]}"#;

/// Career path agent prompt.
/// Replace: {role}, {organization}, {name}, {years}, {current_role}, {skills},
///          {experience}, {horizon}, {grounding_instruction}
pub const CAREER_PATH_PROMPT_TEMPLATE: &str = r#"You are a career coach for software engineers.
Design a learning path that takes the candidate below to a {role} position at {organization}.

CANDIDATE:
- Name: {name}
- Experience: {years} years
- Current role: {current_role}

SKILLS:
{skills}

RECENT EXPERIENCE:
{experience}

{grounding_instruction}

Plan over a {horizon} horizon. Structure it as ordered milestones; each milestone has
concrete steps. For each milestone include: "title", "duration_weeks", "goals",
"steps" (each with "action" and "resource"), and "success_criteria".
Close with the skill gaps the path closes and the ones it leaves open.

Return a JSON object: {"milestones": [ ... ], "skill_gaps": {"closed": [ ... ], "open": [ ... ]}}"#;

pub const INTERVIEW_FALLBACK: &str = r#"{
  "questions": [
    {
      "type": "experience",
      "question": "Walk me through the most challenging project you have worked on.",
      "intent": "Problem solving ability and technical depth",
      "keywords": ["problem definition", "approach", "outcome", "lessons"],
      "followup": "What was the biggest lesson from that experience?"
    },
    {
      "type": "technical_depth",
      "question": "What are the strengths and weaknesses of the stack you use today?",
      "intent": "Technical understanding and critical thinking",
      "keywords": ["trade-offs", "performance", "maintainability", "scalability"],
      "followup": "Which alternatives did you consider?"
    }
  ]
}"#;

pub const TECHNICAL_FALLBACK: &str = r#"{
  "technical_questions": [
    {
      "category": "algorithms",
      "question": "Explain an algorithm that finds the longest substring without repeating characters.",
      "difficulty": 3,
      "time_minutes": 30,
      "evaluation_points": ["time complexity", "sliding window", "hash map usage"],
      "key_concepts": ["Two Pointers", "Hash Map", "O(n) solution"],
      "hint": "Try a sliding window backed by a hash map."
    },
    {
      "category": "system_design",
      "question": "Design a URL shortening service.",
      "difficulty": 4,
      "time_minutes": 45,
      "evaluation_points": ["scalability", "data model", "caching strategy", "distribution"],
      "key_concepts": ["Base62 encoding", "NoSQL vs SQL", "Cache", "Load Balancer"],
      "hint": "It must handle one billion requests per day."
    }
  ]
}"#;

pub const BEHAVIORAL_FALLBACK: &str = r#"{
  "behavioral_questions": [
    {
      "category": "leadership_teamwork",
      "question": "Describe a disagreement within your team and how it was resolved.",
      "competency": "Conflict resolution, collaboration",
      "good_answer_traits": ["specific situation", "acknowledges other views", "mediates", "win-win outcome", "names a lesson"],
      "red_flags": ["deflects responsibility", "one-sided blame", "emotional reaction", "no resolution"],
      "followup": "How did that experience change how the team worked afterwards?"
    },
    {
      "category": "problem_solving",
      "question": "Tell me about delivering an urgent project with limited resources.",
      "competency": "Prioritization, creative problem solving",
      "good_answer_traits": ["clear priorities", "creative solution", "risk management", "stakeholder communication", "measured result"],
      "red_flags": ["no plan", "ignores quality", "decides alone", "denies failure"],
      "followup": "What would you do differently in the same situation?"
    },
    {
      "category": "growth_mindset",
      "question": "What was your biggest career failure and what did you learn from it?",
      "competency": "Self-awareness, learning, resilience",
      "good_answer_traits": ["honest about the failure", "root cause analysis", "concrete changes", "turned into growth", "positive outlook"],
      "red_flags": ["denies failure", "blames others", "no learning", "repeats the mistake"],
      "followup": "How have you applied that lesson recently?"
    }
  ]
}"#;

pub const CAREER_PATH_FALLBACK: &str = r#"{
  "milestones": [
    {
      "title": "Strengthen fundamentals",
      "duration_weeks": 8,
      "goals": ["Close gaps in core computer science topics used daily"],
      "steps": [
        {"action": "Review data structures and complexity analysis", "resource": "A standard algorithms textbook"},
        {"action": "Solve two practice problems per week", "resource": "Any online judge"}
      ],
      "success_criteria": "Can explain trade-offs of common data structures in an interview setting"
    },
    {
      "title": "Ship a portfolio project in the target domain",
      "duration_weeks": 12,
      "goals": ["Demonstrate the target role's core responsibilities end to end"],
      "steps": [
        {"action": "Scope a small service with persistence and an API", "resource": "Framework documentation"},
        {"action": "Write a design document and a post-mortem", "resource": "Public engineering blogs"}
      ],
      "success_criteria": "Project is deployed and documented"
    }
  ],
  "skill_gaps": {"closed": [], "open": []}
}"#;
